//! Cached, single-flight access to the current token.
//!
//! [`CredentialProvider`] pairs a [`CredentialCache`] with a
//! [`CredentialAuthority`]. On a cache miss exactly one caller fetches; the
//! others wait on the fetch guard and then find the fresh token in the cache.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use inkpost_core::InkpostConfig;
use tokio::sync::Mutex;

use crate::authority::CredentialAuthority;
use crate::cache::{CacheStatus, CredentialCache};
use crate::error::Result;

/// Hands out tokens, fetching from the authority only when needed.
pub struct CredentialProvider<A> {
    authority: A,
    cache: Arc<CredentialCache>,
    fetch_guard: Mutex<()>,
    fetches: AtomicU64,
}

impl<A: CredentialAuthority> CredentialProvider<A> {
    /// Create a provider over a shared cache.
    pub fn new(authority: A, cache: Arc<CredentialCache>) -> Self {
        Self {
            authority,
            cache,
            fetch_guard: Mutex::new(()),
            fetches: AtomicU64::new(0),
        }
    }

    /// Create a provider with its own default cache.
    pub fn with_default_cache(authority: A) -> Self {
        Self::new(authority, Arc::new(CredentialCache::new()))
    }

    /// Create a provider for a validated configuration, with a cache using
    /// its `[cache]` timings.
    pub fn from_config(authority: A, config: &InkpostConfig) -> Result<Self> {
        config.validate()?;
        let cache = CredentialCache::from_settings(&config.cache);
        Ok(Self::new(authority, Arc::new(cache)))
    }

    /// The cache backing this provider.
    pub fn cache(&self) -> &Arc<CredentialCache> {
        &self.cache
    }

    /// The wrapped authority.
    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Number of authority fetches made so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    /// A valid token, from the cache when possible.
    pub async fn token(&self) -> Result<String> {
        if let Some(token) = self.cache.get() {
            return Ok(token);
        }

        let _guard = self.fetch_guard.lock().await;
        // Another caller may have fetched while we waited.
        if let Some(token) = self.cache.get() {
            return Ok(token);
        }
        self.fetch_and_store().await
    }

    /// Fetch a new token even if the cached one is still live.
    pub async fn refresh(&self) -> Result<String> {
        let _guard = self.fetch_guard.lock().await;
        self.fetch_and_store().await
    }

    /// Drop the cached token.
    pub fn invalidate(&self) {
        self.cache.clear();
        log::info!("Access token cache invalidated");
    }

    /// Cache status.
    pub fn status(&self) -> CacheStatus {
        self.cache.status()
    }

    /// Run `op` with a token, retrying once with a fresh token if the token
    /// is rejected.
    ///
    /// Only token-related failures trigger the retry; every other error and
    /// the outcome of the retry are returned as they are. Only the rejected
    /// token is dropped from the cache, so a token another caller already
    /// refreshed is reused instead of fetched again.
    pub async fn authorized<F, Fut, T>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let token = self.token().await?;
        match op(token.clone()).await {
            Err(err) if err.is_token_related() => {
                log::warn!("Token rejected ({err}); retrying with a fresh one");
                if !self.cache.clear_if(&token) {
                    log::debug!("Rejected token was already replaced");
                }
                let token = self.token().await?;
                op(token).await
            }
            outcome => outcome,
        }
    }

    async fn fetch_and_store(&self) -> Result<String> {
        log::debug!("Fetching access token from authority");
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let grant = self.authority.fetch().await?;
        self.cache.set(grant.token.clone(), grant.ttl_secs);

        log::info!("Access token fetched");
        Ok(grant.token)
    }
}

impl<A> std::fmt::Debug for CredentialProvider<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialProvider")
            .field("cache", &self.cache)
            .field("fetches", &self.fetches.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
