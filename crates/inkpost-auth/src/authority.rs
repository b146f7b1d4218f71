//! The credential authority seam.
//!
//! An authority exchanges the application's id and secret for a short-lived
//! access token. The HTTP exchange itself lives outside this crate;
//! implementations plug in through [`CredentialAuthority`] and can use
//! [`parse_token_response`] to interpret the authority's JSON body.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AuthorityError, Error, Result};

/// TTL assumed when the authority does not state one.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7200;

/// A freshly issued token and its lifetime at the authority.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// The bearer token.
    pub token: String,
    /// Seconds until the authority stops accepting the token.
    pub ttl_secs: u64,
}

impl TokenGrant {
    /// Create a grant.
    pub fn new(token: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            token: token.into(),
            ttl_secs,
        }
    }
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("token", &"***")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

/// Source of fresh access tokens.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use inkpost_auth::{CredentialAuthority, Result, TokenGrant};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl CredentialAuthority for Fixed {
///     async fn fetch(&self) -> Result<TokenGrant> {
///         Ok(TokenGrant::new("token", 7200))
///     }
/// }
/// ```
#[async_trait]
pub trait CredentialAuthority: Send + Sync {
    /// Request a new token from the authority.
    async fn fetch(&self) -> Result<TokenGrant>;
}

#[async_trait]
impl<A: CredentialAuthority + ?Sized> CredentialAuthority for std::sync::Arc<A> {
    async fn fetch(&self) -> Result<TokenGrant> {
        (**self).fetch().await
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

/// Interpret the authority's token endpoint response body.
///
/// A non-zero `errcode` becomes [`Error::Authority`]; a body without a
/// non-empty `access_token` is an [`Error::InvalidResponse`]. A missing
/// `expires_in` falls back to [`DEFAULT_TOKEN_TTL_SECS`].
///
/// # Example
///
/// ```rust
/// use inkpost_auth::parse_token_response;
///
/// let grant = parse_token_response(r#"{"access_token":"abc","expires_in":7200}"#).unwrap();
/// assert_eq!(grant.token, "abc");
/// assert_eq!(grant.ttl_secs, 7200);
///
/// let err = parse_token_response(r#"{"errcode":40013,"errmsg":""}"#).unwrap_err();
/// assert!(err.authority().is_some_and(|e| e.is_auth_config()));
/// ```
pub fn parse_token_response(body: &str) -> Result<TokenGrant> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::invalid_response(format!("token response is not JSON: {e}")))?;

    if let Some(err) = AuthorityError::from_body(&value) {
        return Err(err.into());
    }

    let response: TokenResponse = serde_json::from_value(value)
        .map_err(|e| Error::invalid_response(format!("unexpected token response: {e}")))?;

    match response.access_token {
        Some(token) if !token.is_empty() => Ok(TokenGrant {
            token,
            ttl_secs: response.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        }),
        _ => Err(Error::invalid_response("missing access_token")),
    }
}
