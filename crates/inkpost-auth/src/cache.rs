//! Single-slot credential cache.
//!
//! Holds at most one token. A stored token is reported as expired
//! `buffer` before the authority's own expiry, so a token handed out by
//! [`CredentialCache::get`] is never one the authority has already dropped.
//!
//! `set` also schedules a one-shot early-warning task that logs shortly
//! before local expiry. The task only logs; it never refreshes. It is
//! aborted whenever the token it was scheduled for goes away: on `set`,
//! `clear`, expiry detected on read, and drop.
//!
//! Time comes from [`tokio::time::Instant`], so paused-clock tests can move
//! through a whole token lifetime instantly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use inkpost_core::CacheSettings;

/// Default margin between local and authority-side expiry (5 minutes).
pub const DEFAULT_BUFFER: Duration = Duration::from_secs(300);

/// Default lead time of the early warning before local expiry (1 minute).
pub const DEFAULT_WARN_LEAD: Duration = Duration::from_secs(60);

/// Longest local lifetime a token is kept for, whatever TTL the authority
/// reports (30 days).
pub const MAX_LIFETIME: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Snapshot of the cache for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    /// Whether a live token is held.
    pub exists: bool,
    /// Whole seconds until local expiry, when a token is held.
    pub seconds_remaining: Option<u64>,
}

struct Credential {
    token: String,
    issued_at: Instant,
    expires_at: Instant,
}

#[derive(Default)]
struct State {
    credential: Option<Credential>,
    timer: Option<JoinHandle<()>>,
}

impl State {
    fn reset(&mut self) {
        self.credential = None;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// In-memory cache for the one live access token.
///
/// The cache never fetches. Callers that need at-most-one fetch in flight
/// go through [`CredentialProvider`](crate::CredentialProvider).
pub struct CredentialCache {
    buffer: Duration,
    warn_lead: Duration,
    state: Mutex<State>,
    warnings: Arc<AtomicU64>,
}

impl Default for CredentialCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialCache {
    /// Create a cache with the default buffer and warning lead.
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_BUFFER, DEFAULT_WARN_LEAD)
    }

    /// Create a cache with explicit timings.
    pub fn with_buffer(buffer: Duration, warn_lead: Duration) -> Self {
        Self {
            buffer,
            warn_lead,
            state: Mutex::new(State::default()),
            warnings: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a cache from configuration.
    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::with_buffer(
            Duration::from_secs(settings.buffer_secs),
            Duration::from_secs(settings.warn_lead_secs),
        )
    }

    /// Safety margin subtracted from every TTL.
    pub fn buffer(&self) -> Duration {
        self.buffer
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a token valid for `ttl_secs` at the authority.
    ///
    /// Replaces any held token and cancels its pending warning. The local
    /// lifetime is capped at [`MAX_LIFETIME`].
    pub fn set(&self, token: impl Into<String>, ttl_secs: u64) {
        let now = Instant::now();
        let mut lifetime = Duration::from_secs(ttl_secs).saturating_sub(self.buffer);
        if lifetime > MAX_LIFETIME {
            log::warn!(
                "Authority ttl {ttl_secs}s exceeds the maximum, keeping token for {}s",
                MAX_LIFETIME.as_secs()
            );
            lifetime = MAX_LIFETIME;
        }

        let mut state = self.lock();
        state.reset();
        state.credential = Some(Credential {
            token: token.into(),
            issued_at: now,
            expires_at: now + lifetime,
        });
        state.timer = self.schedule_warning(lifetime);

        log::info!(
            "Stored access token (authority ttl {ttl_secs}s, usable for {}s)",
            lifetime.as_secs()
        );
    }

    /// The held token, unless it has expired.
    ///
    /// An expired token is dropped on the way out.
    pub fn get(&self) -> Option<String> {
        let mut state = self.lock();
        let live = state
            .credential
            .as_ref()
            .map(|credential| Instant::now() < credential.expires_at)?;

        if live {
            state.credential.as_ref().map(|credential| credential.token.clone())
        } else {
            log::debug!("Cached access token expired");
            state.reset();
            None
        }
    }

    /// Drop the held token and cancel its warning.
    pub fn clear(&self) {
        self.lock().reset();
    }

    /// Drop the held token only if it is `token`.
    ///
    /// Returns `true` when the cache is now empty: either `token` was
    /// dropped or nothing was held. A different token stays in place.
    pub fn clear_if(&self, token: &str) -> bool {
        let mut state = self.lock();
        match state.credential.as_ref() {
            Some(credential) if credential.token == token => {
                state.reset();
                true
            }
            Some(_) => false,
            None => true,
        }
    }

    /// True when no token is held or less than `buffer` remains.
    pub fn is_expiring_soon(&self) -> bool {
        self.remaining().is_none_or(|remaining| remaining < self.buffer)
    }

    /// Report whether a live token is held and how long it has left.
    ///
    /// An expired token is dropped and reported as absent.
    pub fn status(&self) -> CacheStatus {
        let mut state = self.lock();
        let remaining = state
            .credential
            .as_ref()
            .map(|credential| credential.expires_at.saturating_duration_since(Instant::now()));

        match remaining {
            Some(remaining) if !remaining.is_zero() => CacheStatus {
                exists: true,
                seconds_remaining: Some(remaining.as_secs()),
            },
            Some(_) => {
                state.reset();
                CacheStatus {
                    exists: false,
                    seconds_remaining: None,
                }
            }
            None => CacheStatus {
                exists: false,
                seconds_remaining: None,
            },
        }
    }

    /// How long ago the held token was stored.
    pub fn age(&self) -> Option<Duration> {
        self.lock()
            .credential
            .as_ref()
            .map(|credential| credential.issued_at.elapsed())
    }

    /// Number of early warnings fired so far.
    pub fn early_warnings(&self) -> u64 {
        self.warnings.load(Ordering::Relaxed)
    }

    fn remaining(&self) -> Option<Duration> {
        self.lock()
            .credential
            .as_ref()
            .map(|credential| credential.expires_at.saturating_duration_since(Instant::now()))
    }

    fn schedule_warning(&self, lifetime: Duration) -> Option<JoinHandle<()>> {
        let delay = lifetime.saturating_sub(self.warn_lead);
        if delay.is_zero() {
            return None;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::debug!("No async runtime; skipping expiry warning");
            return None;
        };

        let warnings = Arc::clone(&self.warnings);
        let deadline = Instant::now().checked_add(delay)?;
        Some(handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            warnings.fetch_add(1, Ordering::Relaxed);
            log::warn!("Credential will expire soon, consider refreshing");
        }))
    }
}

impl Drop for CredentialCache {
    fn drop(&mut self) {
        self.lock().reset();
    }
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("buffer", &self.buffer)
            .field("warn_lead", &self.warn_lead)
            .field("seconds_remaining", &self.remaining().map(|d| d.as_secs()))
            .finish()
    }
}
