//! End-to-end draft publishing.

use inkpost::auth::AuthorityError;
use inkpost::content::CommentFlag;
use inkpost::{publish_draft, DraftRequest, Error, MockPublisher};

use crate::common::{MockAuthority, TestContext};

const ARTICLE: &str = "---\ntitle: Release 1.0\nauthor: Ann\n---\n# Release 1.0\n\nWe shipped **it**.\n\n- fast\n- safe\n";

#[tokio::test(start_paused = true)]
async fn test_publish_converts_and_returns_media_id() {
    let ctx = TestContext::new();
    let request = DraftRequest {
        need_open_comment: Some(CommentFlag::On),
        ..DraftRequest::new(ARTICLE)
    };

    let media_id = publish_draft(&request, &ctx.provider, &ctx.publisher)
        .await
        .expect("publish should succeed");
    assert!(media_id.starts_with("mock_media_id_"));

    let calls = ctx.publisher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].token, "token-1");

    let article = &calls[0].articles[0];
    assert_eq!(article.title, "Release 1.0");
    assert_eq!(article.author.as_deref(), Some("Ann"));
    assert_eq!(article.need_open_comment, Some(CommentFlag::On));
    assert_eq!(
        article.content,
        "<h1>Release 1.0</h1><p>We shipped <strong>it</strong>.</p><ul><li>fast</li><li>safe</li></ul>"
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_publish_reuses_cached_token() {
    let ctx = TestContext::new();
    let request = DraftRequest::new(ARTICLE);

    publish_draft(&request, &ctx.provider, &ctx.publisher).await.unwrap();
    publish_draft(&request, &ctx.provider, &ctx.publisher).await.unwrap();

    assert_eq!(ctx.authority.issued(), 1);
    assert_eq!(ctx.publisher.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_token_is_replaced_and_retried_once() {
    let ctx = TestContext::with_parts(MockAuthority::new(), MockPublisher::failing_once(40001));

    let media_id = publish_draft(&DraftRequest::new(ARTICLE), &ctx.provider, &ctx.publisher)
        .await
        .unwrap();
    assert!(media_id.starts_with("mock_media_id_"));

    let tokens: Vec<String> = ctx.publisher.calls().into_iter().map(|c| c.token).collect();
    assert_eq!(tokens, vec!["token-1", "token-2"]);
    assert_eq!(ctx.authority.issued(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_non_token_failure_is_not_retried() {
    let ctx = TestContext::with_parts(MockAuthority::new(), MockPublisher::new());
    ctx.publisher.push_failure(AuthorityError::new(45009, "reach max api daily quota limit"));

    let err = publish_draft(&DraftRequest::new(ARTICLE), &ctx.provider, &ctx.publisher)
        .await
        .unwrap_err();

    assert!(matches!(&err, Error::Auth(e) if e.authority().is_some_and(|a| a.code == 45009)));
    assert_eq!(ctx.publisher.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_authority_failure_propagates() {
    let ctx = TestContext::with_parts(MockAuthority::rejecting(40125), MockPublisher::new());

    let err = publish_draft(&DraftRequest::new(ARTICLE), &ctx.provider, &ctx.publisher)
        .await
        .unwrap_err();

    match err {
        Error::Auth(e) => assert!(e.authority().is_some_and(AuthorityError::is_auth_config)),
        other => panic!("unexpected error: {other}"),
    }
    assert!(ctx.publisher.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_request_never_fetches_a_token() {
    let ctx = TestContext::new();

    let err = publish_draft(&DraftRequest::new("no title here"), &ctx.provider, &ctx.publisher)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingTitle));

    let err = publish_draft(&DraftRequest::new(""), &ctx.provider, &ctx.publisher)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingMarkdown));

    assert_eq!(ctx.authority.issued(), 0);
    assert!(!ctx.provider.status().exists);
}
