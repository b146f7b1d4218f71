//! Errors from the publishing workflow.

/// Errors that can occur while publishing a draft.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The request carried no Markdown.
    #[error("markdown is required")]
    MissingMarkdown,

    /// No title in the request, the frontmatter, or a top-level heading.
    #[error("title is required (provide in request, frontmatter, or as first heading)")]
    MissingTitle,

    /// Token acquisition or the publishing call failed.
    #[error(transparent)]
    Auth(#[from] inkpost_auth::Error),

    /// Configuration or I/O failure.
    #[error(transparent)]
    Core(#[from] inkpost_core::Error),
}

/// Result type alias for the publishing workflow.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the caller sent a bad request, as opposed to a failure on
    /// our side or the platform's.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::MissingMarkdown | Error::MissingTitle => true,
            Error::Auth(e) => e.authority().is_some(),
            Error::Core(_) => false,
        }
    }

    /// Whether trying again later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Auth(e) => e.is_retryable(),
            Error::MissingMarkdown | Error::MissingTitle | Error::Core(_) => false,
        }
    }
}
