use std::time::Duration;

use lumen_api::{ApiClient, ApiError, Upload};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};

fn conv_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z",
    })
}

fn client(server: &ServerGuard) -> ApiClient {
    ApiClient::http(server.url(), Duration::from_secs(5), Duration::from_secs(60)).unwrap()
}

#[tokio::test]
async fn test_conversations_are_served_from_cache() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/conversations")
        .with_header("content-type", "application/json")
        .with_body(json!([conv_json("c1", "Planning")]).to_string())
        .expect(1)
        .create_async()
        .await;

    let api = client(&server);
    let first = api.conversations(false).await.unwrap();
    let second = api.conversations(false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].title, "Planning");
    list.assert_async().await;
    assert_eq!(api.cache_stats().hits, 1);
}

#[tokio::test]
async fn test_create_conversation_invalidates_list() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/conversations")
        .with_header("content-type", "application/json")
        .with_body(json!([]).to_string())
        .expect(2)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/api/conversations")
        .match_body(Matcher::Json(json!({"title": "Roadmap"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(conv_json("c9", "Roadmap").to_string())
        .expect(1)
        .create_async()
        .await;

    let api = client(&server);
    api.conversations(false).await.unwrap();
    let created = api.create_conversation("Roadmap").await.unwrap();
    api.conversations(false).await.unwrap();

    assert_eq!(created.id, "c9");
    list.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_mutation_leaves_unrelated_tags_fresh() {
    let mut server = Server::new_async().await;
    let status = server
        .mock("GET", "/api/status")
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "ok", "version": "1.4.0"}).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/api/conversations")
        .with_header("content-type", "application/json")
        .with_body(conv_json("c1", "Anything").to_string())
        .create_async()
        .await;

    let api = client(&server);
    let before = api.system_status().await.unwrap();
    api.create_conversation("Anything").await.unwrap();
    let after = api.system_status().await.unwrap();

    assert!(before.is_healthy());
    assert_eq!(after.version.as_deref(), Some("1.4.0"));
    status.assert_async().await;
}

#[tokio::test]
async fn test_force_refetch_bypasses_cache() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/conversations")
        .with_header("content-type", "application/json")
        .with_body(json!([]).to_string())
        .expect(2)
        .create_async()
        .await;

    let api = client(&server);
    api.conversations(false).await.unwrap();
    api.conversations(true).await.unwrap();
    list.assert_async().await;
}

#[tokio::test]
async fn test_send_message_posts_variant_and_is_not_cached() {
    let mut server = Server::new_async().await;
    let send = server
        .mock("POST", "/api/chat/send")
        .match_body(Matcher::Json(json!({
            "message": "What changed this week?",
            "variant_id": "research-analyst",
        })))
        .with_header("content-type", "application/json")
        .with_body(json!({"content": "Three things.", "model": "gpt-4o"}).to_string())
        .expect(2)
        .create_async()
        .await;

    let api = client(&server);
    for _ in 0..2 {
        let reply = api
            .send_message("What changed this week?", "research-analyst")
            .await
            .unwrap();
        assert_eq!(reply.content, "Three things.");
        assert_eq!(reply.model.as_deref(), Some("gpt-4o"));
    }
    send.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_surfaced() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/status")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let api = client(&server);
    let err = api.system_status().await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(api.cache_stats().total_entries, 0);
}

#[tokio::test]
async fn test_failed_fetch_leaves_nothing_behind() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/conversations")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let api = client(&server);
    assert!(api.conversations(false).await.is_err());

    let stats = api.cache_stats();
    assert_eq!(stats.pending_requests, 0);
    assert_eq!(stats.tracked_keys, 1);

    assert_eq!(api.cache().cleanup_expired(), 1);
    assert_eq!(api.cache_stats().tracked_keys, 0);
}

#[tokio::test]
async fn test_undecodable_response_releases_the_request() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/status")
        .with_header("content-type", "application/json")
        .with_body(json!({"unexpected": true}).to_string())
        .create_async()
        .await;

    let api = client(&server);
    assert!(matches!(api.system_status().await, Err(ApiError::Decode(_))));
    assert_eq!(api.cache_stats().pending_requests, 0);
    assert_eq!(api.cache().cleanup_expired(), 1);
}

#[tokio::test]
async fn test_upload_sends_multipart() {
    let mut server = Server::new_async().await;
    let upload = server
        .mock("POST", "/api/upload")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
        .match_body(Matcher::Regex("notes.txt".into()))
        .with_header("content-type", "application/json")
        .with_body(json!({"fileId": "f-17", "size": 11}).to_string())
        .create_async()
        .await;

    let api = client(&server);
    let result = api
        .upload(Upload::new("notes.txt", b"hello world".to_vec()).with_mime_type("text/plain"))
        .await
        .unwrap();

    assert_eq!(result["fileId"], "f-17");
    upload.assert_async().await;
}

#[tokio::test]
async fn test_prefetch_warms_both_queries() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/status")
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "ok"}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/api/conversations")
        .with_header("content-type", "application/json")
        .with_body(json!([conv_json("a", "A"), conv_json("b", "B")]).to_string())
        .create_async()
        .await;

    let api = client(&server);
    let (status, conversations) = api.prefetch().await.unwrap();
    assert_eq!(status.status, "ok");
    assert_eq!(conversations.len(), 2);
    assert_eq!(api.cache_stats().fresh_entries, 2);
}
