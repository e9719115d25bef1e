use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use folio_core::storage::{ObjectStore, StorageError, SupabaseStorage};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(Option<String>, Option<String>, Value)>>>,
}

async fn move_handler(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    recorded
        .requests
        .lock()
        .unwrap()
        .push((header("authorization"), header("apikey"), body.clone()));

    match body["sourceKey"].as_str() {
        Some(source) if source.contains("missing") => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not_found", "message": "Object not found" })),
        ),
        Some(source) if source.contains("locked") => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "forbidden", "message": "denied" })),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({ "message": "Successfully moved" })),
        ),
    }
}

async fn spawn_mock() -> (String, Recorded, tokio::task::JoinHandle<()>) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/storage/v1/object/move", post(move_handler))
        .with_state(recorded.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/"), recorded, server)
}

#[tokio::test]
async fn move_sends_bucket_and_keys_with_service_credentials() {
    let (base_url, recorded, server) = spawn_mock().await;
    let storage = SupabaseStorage::new(base_url, "service-key");

    storage
        .move_object("assets", "posts/tmp/abc123/hero/x.png", "posts/42/hero/x.png")
        .await
        .expect("move");

    let requests = recorded.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let (authorization, apikey, body) = &requests[0];
    assert_eq!(authorization.as_deref(), Some("Bearer service-key"));
    assert_eq!(apikey.as_deref(), Some("service-key"));
    assert_eq!(
        body,
        &json!({
            "bucketId": "assets",
            "sourceKey": "posts/tmp/abc123/hero/x.png",
            "destinationKey": "posts/42/hero/x.png"
        })
    );
    server.abort();
}

#[tokio::test]
async fn status_codes_map_to_storage_errors() {
    let (base_url, recorded, server) = spawn_mock().await;
    let storage = SupabaseStorage::new(base_url, "service-key");

    let err = storage
        .move_object("assets", "posts/tmp/missing/a.png", "posts/1/a.png")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound { ref path, .. } if path == "posts/tmp/missing/a.png"));

    let err = storage
        .move_object("assets", "posts/tmp/locked/a.png", "posts/1/a.png")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Rejected { status: 403, .. }));

    // identical paths never leave the process
    storage
        .move_object("assets", "posts/1/a.png", "posts/1/a.png")
        .await
        .expect("no-op");
    assert_eq!(recorded.requests.lock().unwrap().len(), 2);
    server.abort();
}
