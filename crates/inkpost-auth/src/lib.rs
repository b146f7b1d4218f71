//! Credential management for Inkpost.
//!
//! Provides:
//! - [`CredentialCache`]: single-slot token cache with buffered expiry
//! - [`CredentialAuthority`]: trait for fetching fresh tokens
//! - [`CredentialProvider`]: cache plus authority with single-flight fetches
//!   and retry-once on token rejection
//! - [`AuthorityError`] / [`Error`]: the authority's typed failure and its
//!   classification
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use inkpost_auth::{CredentialAuthority, CredentialProvider, Result, TokenGrant};
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl CredentialAuthority for Fixed {
//!     async fn fetch(&self) -> Result<TokenGrant> {
//!         Ok(TokenGrant::new("abc", 7200))
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let provider = CredentialProvider::with_default_cache(Fixed);
//!     assert_eq!(provider.token().await.unwrap(), "abc");
//!     assert!(provider.status().exists);
//! }
//! ```

#![forbid(unsafe_code)]

mod authority;
mod cache;
mod error;
mod provider;

pub use authority::{parse_token_response, CredentialAuthority, TokenGrant, DEFAULT_TOKEN_TTL_SECS};
pub use cache::{CacheStatus, CredentialCache, DEFAULT_BUFFER, DEFAULT_WARN_LEAD, MAX_LIFETIME};
pub use error::{default_message, AuthorityError, Error, Result, AUTH_CONFIG_CODES, TOKEN_RELATED_CODES};
pub use provider::CredentialProvider;
