use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

use rangefetch::api::{router, state::AppState};
use rangefetch::config::Config;
use rangefetch::job::JobController;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a minimal config for testing, bypassing file-based loading.
fn create_test_config() -> Config {
    let config_toml = r#"
[server]
bind_addr = "127.0.0.1:0"

[fetch]
concurrency = 4
request_timeout_secs = 5
connect_timeout_secs = 5
    "#;

    toml::from_str(config_toml).expect("Failed to parse test config")
}

/// Builds a test app with an isolated controller.
fn build_test_app() -> Router {
    let config = create_test_config();
    let controller = JobController::new(&config.fetch).expect("Failed to build controller");
    router(AppState::new(config, controller))
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

fn post_download(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/download")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Polls GET /status until the job reports `running == false`.
async fn wait_until_idle(app: &Router) -> Value {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let response = app.clone().oneshot(get("/status")).await.unwrap();
            let status = read_json(response).await;
            if status["running"] == json!(false) {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("job did not finish in time")
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = build_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn status_is_idle_before_any_job() {
    let app = build_test_app();

    let response = app.oneshot(get("/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["running"], json!(false));
    assert_eq!(body["total"], json!(0));
    assert_eq!(body["completed"], json!(0));
    assert_eq!(body["progress"], json!([]));
}

#[tokio::test]
async fn download_rejects_inverted_range() {
    let app = build_test_app();
    let dir = TempDir::new().unwrap();

    let payload = json!({
        "base_url": "http://127.0.0.1:9/media/{}_0.jpg",
        "start": 10,
        "end": 2,
        "folder": dir.path().join("out"),
    });

    let response = app.oneshot(post_download(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["code"], "INVALID_CONFIG");
    assert!(body["message"].as_str().unwrap().contains("range"));
}

#[tokio::test]
async fn download_rejects_template_without_placeholder() {
    let app = build_test_app();
    let dir = TempDir::new().unwrap();

    let payload = json!({
        "base_url": "http://127.0.0.1:9/media/static.jpg",
        "start": 1,
        "end": 3,
        "folder": dir.path().join("out"),
    });

    let response = app.oneshot(post_download(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["code"], "INVALID_CONFIG");
}

#[tokio::test]
async fn download_rejects_malformed_payload() {
    let app = build_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/download")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"base_url\": 42}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test(flavor = "multi_thread")]
async fn download_runs_to_completion_and_writes_files() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"image-data".to_vec()))
        .mount(&origin)
        .await;

    let app = build_test_app();
    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("images");

    let payload = json!({
        "base_url": format!("{}/media/{{}}_0.jpg", origin.uri()),
        "start": 1,
        "end": 5,
        "folder": folder,
    });

    let response = app.clone().oneshot(post_download(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = read_json(response).await;
    assert_eq!(body["status"], "started");
    assert_eq!(body["total"], json!(5));

    let status = wait_until_idle(&app).await;
    assert_eq!(status["total"], json!(5));
    assert_eq!(status["completed"], json!(5));

    let progress = status["progress"].as_array().unwrap();
    assert_eq!(progress.len(), 5);
    assert!(progress.iter().all(|o| o["status"] == "success"));

    for id in 1..=5 {
        let path = folder.join(format!("{id}_0.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"image-data");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn second_download_conflicts_while_job_is_active() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"x".to_vec())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&origin)
        .await;

    let app = build_test_app();
    let dir = TempDir::new().unwrap();

    let payload = json!({
        "base_url": format!("{}/media/{{}}_0.jpg", origin.uri()),
        "start": 1,
        "end": 6,
        "folder": dir.path().join("a"),
        "concurrency": 2,
    });

    let response = app.clone().oneshot(post_download(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let second = json!({
        "base_url": format!("{}/media/{{}}_0.jpg", origin.uri()),
        "start": 1,
        "end": 2,
        "folder": dir.path().join("b"),
    });

    let response = app.clone().oneshot(post_download(&second)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = read_json(response).await;
    assert_eq!(body["code"], "JOB_ALREADY_ACTIVE");

    // The first job is unaffected and still runs to completion.
    let status = wait_until_idle(&app).await;
    assert_eq!(status["total"], json!(6));
    assert_eq!(status["completed"], json!(6));
}
