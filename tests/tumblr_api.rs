//! Wire-level tests for the Tumblr client against a mock HTTP server.

use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bnotwbot::config::{Config, Credentials};
use bnotwbot::error::AppError;
use bnotwbot::services::{BlogApi, TumblrClient};

fn test_credentials() -> Credentials {
    Credentials {
        consumer_key: "consumer-key".into(),
        consumer_secret: "consumer-secret".into(),
        oauth_token: "oauth-token".into(),
        oauth_secret: "oauth-secret".into(),
        slack_bot_token: "xoxb-test".into(),
        slack_app_token: "xapp-test".into(),
    }
}

async fn client_for(server: &MockServer) -> TumblrClient {
    let mut config = Config::default();
    config.api_base = server.uri();
    TumblrClient::new(&config, &test_credentials()).unwrap()
}

#[tokio::test]
async fn total_posts_reads_blog_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/blog/bnotw.tumblr.com/info"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "meta": { "status": 200, "msg": "OK" },
            "response": { "blog": { "name": "bnotw", "total_posts": 125 } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.total_posts().await.unwrap(), 125);
}

#[tokio::test]
async fn posts_sends_limit_and_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/blog/bnotw.tumblr.com/posts"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "meta": { "status": 200, "msg": "OK" },
            "response": { "posts": [
                { "id": 1, "date": "2023-01-01 00:00:00 GMT", "summary": "first" },
                { "id": 2, "date": "2023-01-02 00:00:00 GMT", "title": "second" }
            ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let posts = client.posts(50, 100).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, 1);
    assert_eq!(posts[0].summary.as_deref(), Some("first"));
    assert_eq!(posts[1].title.as_deref(), Some("second"));
}

#[tokio::test]
async fn create_post_returns_assigned_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/blog/bnotw.tumblr.com/post"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "meta": { "status": 201, "msg": "Created" },
            "response": { "id": 670123 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.create_post("a new bnotw").await.unwrap(), 670123);
}

#[tokio::test]
async fn post_by_id_returns_the_single_post() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/blog/bnotw.tumblr.com/posts"))
        .and(query_param("id", "670123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "meta": { "status": 200, "msg": "OK" },
            "response": { "posts": [
                { "id": 670123, "date": "2023-05-05 09:30:00 GMT", "summary": "a new bnotw" }
            ] }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let post = client.post_by_id(670123).await.unwrap();
    assert_eq!(post.id, 670123);
    assert_eq!(post.summary.as_deref(), Some("a new bnotw"));
}

#[tokio::test]
async fn server_error_is_remote_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/blog/bnotw.tumblr.com/info"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.total_posts().await.unwrap_err();
    assert!(matches!(err, AppError::RemoteUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn rejected_write_is_remote_rejected_with_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/blog/bnotw.tumblr.com/post"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "meta": { "status": 401, "msg": "Not Authorized" },
            "response": []
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.create_post("nope").await.unwrap_err();
    match err {
        AppError::RemoteRejected { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Not Authorized");
        }
        other => panic!("expected RemoteRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_remote_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/blog/bnotw.tumblr.com/info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.total_posts().await.unwrap_err();
    assert!(matches!(err, AppError::RemoteUnavailable(_)), "got {err:?}");
}
