//! Concurrent callers sharing one provider.

use std::sync::Arc;

use futures::future::join_all;
use inkpost::{publish_draft, DraftRequest};

use crate::common::TestContext;

#[tokio::test(start_paused = true)]
async fn test_concurrent_token_requests_fetch_once() {
    let ctx = TestContext::new();

    let tokens = join_all((0..16).map(|_| ctx.provider.token())).await;

    assert_eq!(ctx.authority.issued(), 1);
    for token in tokens {
        assert_eq!(token.unwrap(), "token-1");
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_publishes_share_one_token() {
    let ctx = TestContext::new();
    let requests: Vec<DraftRequest> = (0..8)
        .map(|i| DraftRequest::new(format!("# Post {i}\n\nBody {i}")))
        .collect();

    let results = join_all(
        requests
            .iter()
            .map(|request| publish_draft(request, &ctx.provider, &ctx.publisher)),
    )
    .await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(ctx.authority.issued(), 1);

    let calls = ctx.publisher.calls();
    assert_eq!(calls.len(), 8);
    assert!(calls.iter().all(|call| call.token == "token-1"));
}

#[tokio::test(start_paused = true)]
async fn test_spawned_tasks_fetch_once() {
    let ctx = TestContext::new();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let provider = Arc::clone(&ctx.provider);
            tokio::spawn(async move { provider.token().await })
        })
        .collect();

    for handle in join_all(handles).await {
        assert_eq!(handle.unwrap().unwrap(), "token-1");
    }
    assert_eq!(ctx.authority.issued(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refetch_after_expiry_is_single_flight() {
    let ctx = TestContext::new();
    ctx.provider.token().await.unwrap();

    tokio::time::advance(std::time::Duration::from_secs(7200)).await;
    let tokens = join_all((0..4).map(|_| ctx.provider.token())).await;

    assert_eq!(ctx.authority.issued(), 2);
    assert!(tokens.into_iter().all(|t| t.unwrap() == "token-2"));
}
