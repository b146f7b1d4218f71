//! Error types for credential acquisition and authorized calls.

use std::fmt;

/// Codes meaning the presented token is invalid, expired, or stale.
///
/// The cached token must be dropped and the call retried once with a fresh
/// one.
pub const TOKEN_RELATED_CODES: [i64; 5] = [40001, 40014, 42001, 42002, 42007];

/// Codes meaning the application credentials themselves are wrong.
///
/// Retrying cannot help; the configuration has to change.
pub const AUTH_CONFIG_CODES: [i64; 5] = [40013, 40125, 40164, 40243, 41004];

/// A failure reported by the credential authority or the publishing API.
///
/// Carries the numeric code and message from the response body, and the
/// endpoint that returned it when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityError {
    /// Numeric error code (`errcode`).
    pub code: i64,
    /// Error message (`errmsg`), or a default for the code.
    pub message: String,
    /// Endpoint that returned the error.
    pub api_url: Option<String>,
}

impl fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(url) = &self.api_url {
            write!(f, " ({url})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AuthorityError {}

impl AuthorityError {
    /// Create an error, falling back to the known message for `code` when
    /// `message` is empty.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            default_message(code).unwrap_or("unknown error").to_string()
        } else {
            message
        };
        Self {
            code,
            message,
            api_url: None,
        }
    }

    /// Build an error from a response's `errcode`/`errmsg` pair.
    ///
    /// Returns `None` for code `0`, which signals success.
    pub fn from_response(errcode: i64, errmsg: Option<&str>) -> Option<Self> {
        if errcode == 0 {
            return None;
        }
        Some(Self::new(errcode, errmsg.unwrap_or_default()))
    }

    /// Inspect a JSON response body for a non-zero `errcode`.
    ///
    /// A body without a numeric `errcode` is not an error.
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        let code = body.get("errcode")?.as_i64()?;
        let message = body.get("errmsg").and_then(serde_json::Value::as_str);
        Self::from_response(code, message)
    }

    /// Attach the endpoint that produced this error.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// The token was rejected; invalidate the cache and retry once.
    pub fn is_token_related(&self) -> bool {
        TOKEN_RELATED_CODES.contains(&self.code)
    }

    /// The app id, secret, or caller IP is misconfigured.
    pub fn is_auth_config(&self) -> bool {
        AUTH_CONFIG_CODES.contains(&self.code)
    }

    /// Neither token-related nor a configuration problem.
    pub fn is_transient(&self) -> bool {
        !self.is_token_related() && !self.is_auth_config()
    }
}

/// Known default message for an error code.
pub fn default_message(code: i64) -> Option<&'static str> {
    let message = match code {
        -1 => "system busy, please retry later",
        40001 => "access token is invalid or not the latest",
        40002 => "invalid credential type",
        40013 => "invalid app id",
        40125 => "invalid app secret",
        40164 => "caller IP address is not whitelisted",
        40243 => "app secret is frozen, unfreeze it and retry",
        41004 => "missing secret parameter",
        50004 => "token interface use is forbidden",
        50007 => "account is frozen",
        _ => return None,
    };
    Some(message)
}

/// Errors from credential providers and authorized operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The authority or API answered with an error code.
    #[error("Authority error: {0}")]
    Authority(#[from] AuthorityError),

    /// The response could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request never got a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credentials are not configured.
    #[error(transparent)]
    Config(#[from] inkpost_core::Error),
}

/// Result type alias for inkpost-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Error::InvalidResponse(message.into())
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport(message.into())
    }

    /// The authority error carried by this error, if any.
    pub fn authority(&self) -> Option<&AuthorityError> {
        match self {
            Error::Authority(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the failure calls for a fresh token and one retry.
    pub fn is_token_related(&self) -> bool {
        self.authority().is_some_and(AuthorityError::is_token_related)
    }

    /// Whether trying again later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Authority(e) => e.is_transient(),
            Error::Transport(_) => true,
            Error::InvalidResponse(_) => false,
            Error::Config(_) => false,
        }
    }
}
