//! Shared fixtures for Inkpost integration tests.
//!
//! Every test builds its own [`TestContext`]; nothing is shared between
//! tests through globals.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use inkpost::auth::{
    AuthorityError, CredentialAuthority, CredentialCache, CredentialProvider, Result, TokenGrant,
};
use inkpost::MockPublisher;

/// Authority that issues `token-1`, `token-2`, ... after a delay.
pub struct MockAuthority {
    issued: AtomicUsize,
    delay: Duration,
    ttl_secs: u64,
    failure: Option<i64>,
}

impl MockAuthority {
    /// Issue 7200-second tokens after 100ms.
    pub fn new() -> Self {
        Self {
            issued: AtomicUsize::new(0),
            delay: Duration::from_millis(100),
            ttl_secs: 7200,
            failure: None,
        }
    }

    /// Reject every fetch with `code`.
    pub fn rejecting(code: i64) -> Self {
        Self {
            failure: Some(code),
            ..Self::new()
        }
    }

    /// Tokens issued so far.
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialAuthority for MockAuthority {
    async fn fetch(&self) -> Result<TokenGrant> {
        tokio::time::sleep(self.delay).await;
        if let Some(code) = self.failure {
            return Err(AuthorityError::new(code, "").into());
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TokenGrant::new(format!("token-{n}"), self.ttl_secs))
    }
}

/// Explicit per-test state: a provider over a fresh cache and a publisher.
pub struct TestContext {
    pub provider: Arc<CredentialProvider<Arc<MockAuthority>>>,
    pub authority: Arc<MockAuthority>,
    pub publisher: MockPublisher,
}

impl TestContext {
    /// Context with a working authority and publisher.
    pub fn new() -> Self {
        Self::with_parts(MockAuthority::new(), MockPublisher::new())
    }

    /// Context with the given authority and publisher.
    pub fn with_parts(authority: MockAuthority, publisher: MockPublisher) -> Self {
        let authority = Arc::new(authority);
        let cache = Arc::new(CredentialCache::new());
        let provider = Arc::new(CredentialProvider::new(Arc::clone(&authority), cache));
        Self {
            provider,
            authority,
            publisher,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
