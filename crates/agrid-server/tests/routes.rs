use std::path::Path;

use agrid_application::AssistantService;
use agrid_core::AgridError;
use agrid_core::config::AssistantConfig;
use agrid_server::{AppState, ServerConfig, UploadStore, app};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "agrid-test-boundary";

fn local_assistant() -> AssistantService {
    AssistantService::from_config(
        &AssistantConfig::default(),
        Err(AgridError::config("OPENROUTER_API_KEY not found")),
    )
}

fn test_app(upload_dir: &Path) -> Router {
    let state = AppState::new(local_assistant(), UploadStore::new(upload_dir));
    app(state, &ServerConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn json_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a multipart body from `(field, filename, bytes)` parts.
fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_chat_json_returns_response() {
    let temp_dir = TempDir::new().unwrap();
    let (status, body) = send(test_app(temp_dir.path()), json_request(json!({"message": "hello"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["response"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let temp_dir = TempDir::new().unwrap();
    for payload in [json!({"message": ""}), json!({"message": "   "}), json!({})] {
        let (status, body) = send(test_app(temp_dir.path()), json_request(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Message cannot be empty"}));
    }
}

#[tokio::test]
async fn test_chat_rejects_malformed_json() {
    let temp_dir = TempDir::new().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(test_app(temp_dir.path()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_chat_accepts_url_encoded_form() {
    let temp_dir = TempDir::new().unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("message=bye+for+now"))
        .unwrap();

    let (status, body) = send(test_app(temp_dir.path()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["response"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_multipart_images_are_stored_and_counted() {
    let temp_dir = TempDir::new().unwrap();
    let request = multipart_request(&[
        ("message", None, b"leaf has yellow spots"),
        ("image", Some("leaf one.png"), b"png-bytes"),
        ("image", Some("leaf2.JPG"), b"jpg-bytes"),
        ("image", Some("notes.txt"), b"text"),
    ]);

    let (status, body) = send(test_app(temp_dir.path()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().contains("2 crop images"));

    let mut stored: Vec<String> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    stored.sort();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().any(|name| name.ends_with("_leaf_one.png")));
    assert!(stored.iter().any(|name| name.ends_with("_leaf2.JPG")));
}

#[tokio::test]
async fn test_multipart_duplicate_names_are_kept_apart() {
    let temp_dir = TempDir::new().unwrap();
    let request = multipart_request(&[
        ("message", None, b"compare these"),
        ("image", Some("leaf.png"), b"before"),
        ("image", Some("leaf.png"), b"after"),
    ]);

    let (status, body) = send(test_app(temp_dir.path()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().contains("2 crop images"));

    let mut contents: Vec<Vec<u8>> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| std::fs::read(entry.unwrap().path()).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, vec![b"after".to_vec(), b"before".to_vec()]);
}

#[tokio::test]
async fn test_multipart_without_message_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let request = multipart_request(&[("image", Some("leaf.png"), b"png-bytes")]);

    let (status, body) = send(test_app(temp_dir.path()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message cannot be empty");
}

#[tokio::test]
async fn test_upload_failure_returns_500() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does/not/exist");
    let request = multipart_request(&[
        ("message", None, b"hello"),
        ("image", Some("leaf.png"), b"png-bytes"),
    ]);

    let (status, body) = send(test_app(&missing), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("An error occurred: "));
}

#[tokio::test]
async fn test_health_reports_mode() {
    let temp_dir = TempDir::new().unwrap();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(test_app(temp_dir.path()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "mode": "local", "remote_configured": false})
    );
}
