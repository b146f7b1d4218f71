//! Draft publishing workflow.
//!
//! A [`DraftRequest`] carries Markdown plus optional metadata. Publishing
//! splits off the frontmatter, resolves the title, merges metadata (request
//! values beat frontmatter values), converts the body, and hands the article
//! to a [`Publisher`] under a token from a [`CredentialProvider`]. A rejected
//! token is replaced and the call retried once.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use inkpost_auth::{AuthorityError, CredentialAuthority, CredentialProvider};
use inkpost_content::{
    extract_frontmatter, markdown_to_article, Article, CommentFlag, ConvertOptions,
    FrontmatterResult,
};

use crate::error::{Error, Result};

/// Destination for converted articles.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Create a draft from `articles`, returning the platform's media id.
    async fn add_draft(&self, token: &str, articles: &[Article]) -> inkpost_auth::Result<String>;
}

/// One recorded [`MockPublisher::add_draft`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDraft {
    /// Token the call was made with.
    pub token: String,
    /// Articles submitted.
    pub articles: Vec<Article>,
}

/// Publisher that performs no network I/O.
///
/// Returns `mock_media_id_{millis}` and records every call. Failures can be
/// queued to exercise retry paths.
#[derive(Debug, Default)]
pub struct MockPublisher {
    calls: Mutex<Vec<RecordedDraft>>,
    failures: Mutex<Vec<AuthorityError>>,
}

impl MockPublisher {
    /// A publisher that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call with `code`, then succeed.
    pub fn failing_once(code: i64) -> Self {
        let publisher = Self::new();
        publisher.push_failure(AuthorityError::new(code, ""));
        publisher
    }

    /// Queue a failure for an upcoming call. Failures are used in order.
    pub fn push_failure(&self, error: AuthorityError) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.insert(0, error);
    }

    /// All calls made so far, successful or not.
    pub fn calls(&self) -> Vec<RecordedDraft> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn add_draft(&self, token: &str, articles: &[Article]) -> inkpost_auth::Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedDraft {
                token: token.to_string(),
                articles: articles.to_vec(),
            });

        let failure = self.failures.lock().unwrap_or_else(|e| e.into_inner()).pop();
        if let Some(error) = failure {
            return Err(error.into());
        }

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        log::info!("Mock publisher accepted {} article(s)", articles.len());
        Ok(format!("mock_media_id_{millis}"))
    }
}

/// A request to publish one Markdown document as a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    /// Markdown source, optionally with frontmatter.
    pub markdown: String,
    /// Title; falls back to frontmatter, then the first `# ` heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Author; falls back to frontmatter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Digest; falls back to frontmatter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Source link; falls back to frontmatter `contentSourceUrl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_source_url: Option<String>,
    /// Cover media id; falls back to frontmatter `thumbMediaId`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_media_id: Option<String>,
    /// Whether comments are open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_open_comment: Option<CommentFlag>,
    /// Whether only followers may comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_fans_can_comment: Option<CommentFlag>,
}

impl DraftRequest {
    /// A request with only Markdown set.
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            ..Self::default()
        }
    }
}

/// Outcome of a publish call, in the service's response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftResponse {
    /// Whether the draft was created.
    pub success: bool,
    /// Media id of the created draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    /// What went wrong.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<String>> for DraftResponse {
    fn from(result: &Result<String>) -> Self {
        match result {
            Ok(media_id) => Self {
                success: true,
                media_id: Some(media_id.clone()),
                error: None,
            },
            Err(err) => Self {
                success: false,
                media_id: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Pick the title: request, then frontmatter, then the first `# ` heading
/// in the body. Empty values count as absent.
///
/// # Example
///
/// ```rust
/// use inkpost::content::extract_frontmatter;
/// use inkpost::publish::resolve_title;
///
/// let fm = extract_frontmatter("Intro\n# From Heading\n");
/// assert_eq!(resolve_title(None, &fm).unwrap(), "From Heading");
/// assert_eq!(resolve_title(Some("Explicit"), &fm).unwrap(), "Explicit");
/// ```
pub fn resolve_title(request_title: Option<&str>, frontmatter: &FrontmatterResult<'_>) -> Result<String> {
    non_empty(request_title)
        .or_else(|| non_empty(frontmatter.title()))
        .map(str::to_string)
        .or_else(|| first_heading(frontmatter.body()))
        .ok_or(Error::MissingTitle)
}

/// Text of the first line starting with `#` and whitespace.
fn first_heading(body: &str) -> Option<String> {
    body.lines().find_map(|line| {
        let rest = line.strip_prefix('#')?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let title = rest.trim();
        (!title.is_empty()).then(|| title.to_string())
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Request value if present, else the frontmatter value.
fn merged(request: &Option<String>, frontmatter: Option<&str>) -> Option<String> {
    non_empty(request.as_deref())
        .or_else(|| non_empty(frontmatter))
        .map(str::to_string)
}

/// Build the conversion options for a request and its frontmatter.
pub fn convert_options(
    request: &DraftRequest,
    frontmatter: &FrontmatterResult<'_>,
) -> Result<ConvertOptions> {
    Ok(ConvertOptions {
        title: resolve_title(request.title.as_deref(), frontmatter)?,
        author: merged(&request.author, frontmatter.author()),
        digest: merged(&request.digest, frontmatter.digest()),
        content_source_url: merged(&request.content_source_url, frontmatter.content_source_url()),
        thumb_media_id: merged(&request.thumb_media_id, frontmatter.thumb_media_id()),
        need_open_comment: request.need_open_comment,
        only_fans_can_comment: request.only_fans_can_comment,
    })
}

/// Convert a request into the article that would be published.
pub fn prepare_article(request: &DraftRequest) -> Result<Article> {
    if request.markdown.trim().is_empty() {
        return Err(Error::MissingMarkdown);
    }

    let frontmatter = extract_frontmatter(&request.markdown);
    let options = convert_options(request, &frontmatter)?;
    Ok(markdown_to_article(frontmatter.body(), &options))
}

/// Publish a request as a draft and return the media id.
///
/// Validation and conversion happen before any token is requested, so a bad
/// request never costs an authority fetch.
pub async fn publish_draft<A, P>(
    request: &DraftRequest,
    provider: &CredentialProvider<A>,
    publisher: &P,
) -> Result<String>
where
    A: CredentialAuthority,
    P: Publisher + ?Sized,
{
    let article = prepare_article(request)?;
    log::debug!("Publishing draft '{}'", article.title);

    let article = &article;
    let media_id = provider
        .authorized(|token| async move {
            publisher
                .add_draft(&token, std::slice::from_ref(article))
                .await
        })
        .await?;

    log::info!("Draft created: {media_id}");
    Ok(media_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ------------------------------------------------------------------------
    // Title resolution
    // ------------------------------------------------------------------------

    #[test]
    fn test_title_from_request() {
        let fm = extract_frontmatter("---\ntitle: FM\n---\n# Heading");
        assert_eq!(resolve_title(Some("Req"), &fm).unwrap(), "Req");
    }

    #[test]
    fn test_title_from_frontmatter() {
        let fm = extract_frontmatter("---\ntitle: FM\n---\n# Heading");
        assert_eq!(resolve_title(None, &fm).unwrap(), "FM");
        assert_eq!(resolve_title(Some(""), &fm).unwrap(), "FM");
    }

    #[test]
    fn test_title_from_first_h1() {
        let fm = extract_frontmatter("## Sub\n#NoSpace\n#   Real Title  \n# Later");
        assert_eq!(resolve_title(None, &fm).unwrap(), "Real Title");
    }

    #[test]
    fn test_missing_title() {
        let fm = extract_frontmatter("just text\n## not h1");
        assert!(matches!(resolve_title(None, &fm), Err(Error::MissingTitle)));
    }

    // ------------------------------------------------------------------------
    // Request handling
    // ------------------------------------------------------------------------

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: DraftRequest = serde_json::from_value(json!({
            "markdown": "# T",
            "contentSourceUrl": "https://example.com",
            "thumbMediaId": "m1",
            "needOpenComment": 1,
            "onlyFansCanComment": 0
        }))
        .unwrap();

        assert_eq!(request.content_source_url.as_deref(), Some("https://example.com"));
        assert_eq!(request.thumb_media_id.as_deref(), Some("m1"));
        assert_eq!(request.need_open_comment, Some(CommentFlag::On));
        assert_eq!(request.only_fans_can_comment, Some(CommentFlag::Off));
    }

    #[test]
    fn test_request_beats_frontmatter() {
        let request = DraftRequest {
            author: Some("Request Author".to_string()),
            ..DraftRequest::new("---\nauthor: FM Author\ndigest: FM Digest\n---\n# Title\nBody")
        };
        let article = prepare_article(&request).unwrap();

        assert_eq!(article.title, "Title");
        assert_eq!(article.author.as_deref(), Some("Request Author"));
        assert_eq!(article.digest.as_deref(), Some("FM Digest"));
        assert_eq!(article.content, "<h1>Title</h1><p>Body</p>");
    }

    #[test]
    fn test_empty_markdown_is_rejected() {
        assert!(matches!(
            prepare_article(&DraftRequest::new("")),
            Err(Error::MissingMarkdown)
        ));
        assert!(matches!(
            prepare_article(&DraftRequest::new("  \n ")),
            Err(Error::MissingMarkdown)
        ));
    }

    #[test]
    fn test_response_shapes() {
        let result: Result<String> = Ok("m-1".to_string());
        let ok = DraftResponse::from(&result);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"success": true, "media_id": "m-1"})
        );

        let result: Result<String> = Err(Error::MissingTitle);
        let err = DraftResponse::from(&result);
        assert!(!err.success);
        assert!(err.error.unwrap().starts_with("title is required"));
    }

    // ------------------------------------------------------------------------
    // MockPublisher
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_mock_publisher_records_calls() {
        let publisher = MockPublisher::new();
        let article = markdown_to_article("x", &ConvertOptions::new("T"));

        let media_id = publisher.add_draft("tok", &[article.clone()]).await.unwrap();
        assert!(media_id.starts_with("mock_media_id_"));

        let calls = publisher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token, "tok");
        assert_eq!(calls[0].articles, vec![article]);
    }

    #[tokio::test]
    async fn test_mock_publisher_queued_failures_in_order() {
        let publisher = MockPublisher::new();
        publisher.push_failure(AuthorityError::new(40001, ""));
        publisher.push_failure(AuthorityError::new(-1, ""));

        let first = publisher.add_draft("t", &[]).await.unwrap_err();
        let second = publisher.add_draft("t", &[]).await.unwrap_err();
        assert_eq!(first.authority().map(|e| e.code), Some(40001));
        assert_eq!(second.authority().map(|e| e.code), Some(-1));
        assert!(publisher.add_draft("t", &[]).await.is_ok());
    }
}
