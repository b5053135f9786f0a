//! HTTP adapter behaviour against a mock backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use lexdesk_core::{DurableStorage, TOKEN_KEY};
use lexdesk_http::{
    ApiError, HttpClient, HttpConfig, Method, QueryParams, RequestBody, multipart,
};
use lexdesk_testing::{MemoryStorage, RecordingNavigator};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(
    server: &MockServer,
    storage: &MemoryStorage,
    navigator: &RecordingNavigator,
) -> HttpClient {
    let config = HttpConfig {
        base_url: server.uri(),
        ..HttpConfig::default()
    };
    HttpClient::new(config, Arc::new(storage.clone()), Arc::new(navigator.clone())).unwrap()
}

#[tokio::test]
async fn attaches_bearer_token_from_storage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"list": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "tok-123")]);
    let client = client_for(&server, &storage, &RecordingNavigator::at("/contacts"));

    let body = client.get("/contacts", &QueryParams::new()).await.unwrap();
    assert_eq!(body, json!({"data": {"list": []}}));
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reference/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, &MemoryStorage::new(), &RecordingNavigator::at("/"));
    client
        .get("/reference/countries", &QueryParams::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn unauthorized_purges_token_and_redirects() {
    lexdesk_testing::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/matters"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Session expired"})),
        )
        .mount(&server)
        .await;

    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "stale")]);
    let navigator = RecordingNavigator::at("/matters");
    let client = client_for(&server, &storage, &navigator);

    let err = client.get("/matters", &QueryParams::new()).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Session expired");
    assert!(storage.get(TOKEN_KEY).is_none());
    assert_eq!(navigator.redirects(), vec!["/sign-in".to_string()]);
}

#[tokio::test]
async fn unauthorized_on_sign_in_page_does_not_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "stale")]);
    let navigator = RecordingNavigator::at("/sign-in");
    let client = client_for(&server, &storage, &navigator);

    let response = client
        .request(Method::POST, "/auth/login", RequestBody::Json(json!({})), &[])
        .await
        .unwrap();

    assert_eq!(response.status, 401);
    assert!(!storage.contains(TOKEN_KEY));
    assert!(navigator.redirects().is_empty());
}

#[tokio::test]
async fn unauthorized_hook_runs_on_every_401() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let client = client_for(&server, &MemoryStorage::new(), &RecordingNavigator::at("/users"))
        .with_unauthorized_hook(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

    let _ = client.delete("/users/1").await;
    let _ = client.delete("/users/2").await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn other_statuses_pass_through_with_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Email already exists",
            "errors": {"email": "taken"}
        })))
        .mount(&server)
        .await;

    let storage = MemoryStorage::with_entries([(TOKEN_KEY, "tok")]);
    let navigator = RecordingNavigator::at("/contacts/new");
    let client = client_for(&server, &storage, &navigator);

    let err = client
        .post("/contacts", json!({"email": "a@b.c"}))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Server {
            status: 422,
            message: "Email already exists".to_string(),
            errors: Some(json!({"email": "taken"})),
        }
    );
    assert!(storage.contains(TOKEN_KEY));
    assert!(navigator.redirects().is_empty());
}

#[tokio::test]
async fn query_params_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time-entries"))
        .and(query_param("matterId", "m-9"))
        .and(query_param("isBillable", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": [], "total": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &MemoryStorage::new(), &RecordingNavigator::at("/"));
    let query = QueryParams::new()
        .with("matterId", "m-9")
        .with_opt::<&str>("categoryId", None)
        .with("isBillable", true);

    client.get("/time-entries", &query).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("matterId=m-9&isBillable=true"));
}

#[tokio::test]
async fn multipart_body_gets_transport_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/users/7/profile-image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
        .mount(&server)
        .await;

    let client = client_for(&server, &MemoryStorage::new(), &RecordingNavigator::at("/"));
    let form = multipart::Form::new().part(
        "image",
        multipart::Part::bytes(vec![1, 2, 3]).file_name("avatar.png"),
    );

    client
        .send(Method::PATCH, "/users/7/profile-image", RequestBody::Multipart(form))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = HttpConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(50),
        ..HttpConfig::default()
    };
    let client = HttpClient::new(
        config,
        Arc::new(MemoryStorage::new()),
        Arc::new(RecordingNavigator::at("/")),
    )
    .unwrap();

    let err = client.get("/slow", &QueryParams::new()).await.unwrap_err();
    assert_eq!(err, ApiError::Timeout(Duration::from_millis(50)));
}
