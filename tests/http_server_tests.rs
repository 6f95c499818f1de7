#![cfg(feature = "server")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use plant_profile::server::{build_router, AppState};
use plant_profile::{engine_from_config, LocalStorage, ReferenceTables, TomlConfig};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "plantprofileboundary";

fn router(server: &MockServer, uploads: &TempDir) -> axum::Router {
    router_with_storage(server, uploads.path())
}

fn router_with_storage(server: &MockServer, upload_dir: &Path) -> axum::Router {
    let config = TomlConfig::from_toml_str(&format!(
        "[recognition]\nendpoint = \"{}\"\napi_key = \"test-key\"\n\n\
         [registry]\nbase_url = \"{}\"\n",
        server.url("/v2/identify/all"),
        server.url("/v1")
    ))
    .unwrap();

    let engine = engine_from_config(&config, ReferenceTables::builtin());
    let storage = LocalStorage::new(upload_dir.to_str().unwrap());
    build_router(AppState::new(engine, storage))
}

fn mock_aloe(server: &MockServer) {
    server.mock(|when, then| {
        when.method(POST).path("/v2/identify/all");
        then.status(200).json_body(serde_json::json!({
            "results": [{"score": 0.91, "species": {"scientificNameWithoutAuthor": "Aloe vera"}}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/species");
        then.status(200).json_body(serde_json::json!({"results": []}));
    });
}

fn multipart_request(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/identify")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_route() {
    let server = MockServer::start();
    let uploads = TempDir::new().unwrap();

    let response = router(&server, &uploads)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["reference_entries"], 12);
}

#[tokio::test]
async fn test_identify_success() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v2/identify/all");
        then.status(200).json_body(serde_json::json!({
            "results": [
                {"score": 0.8734, "species": {"scientificNameWithoutAuthor": "Azadirachta indica"}},
                {"score": 0.1, "species": {"scientificNameWithoutAuthor": "Melia azedarach"}}
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/species");
        then.status(200).json_body(serde_json::json!({
            "results": [{"key": 3190512, "kingdom": "Plantae", "family": "Meliaceae"}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/species/3190512/distributions");
        then.status(200).json_body(serde_json::json!({"results": [{"area": "India"}]}));
    });
    let uploads = TempDir::new().unwrap();

    let app = router(&server, &uploads);
    let response = app
        .clone()
        .oneshot(multipart_request("file", "neem.jpg", b"jpeg-bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["scientific_name"], "Azadirachta indica");
    assert_eq!(json["common_name"], "Neem");
    assert_eq!(json["confidence"], "87.34%");
    assert_eq!(
        json["taxonomy"],
        "Kingdom: Plantae, Phylum: Unknown, Class: Unknown, Order: Unknown, Family: Meliaceae"
    );
    assert_eq!(json["distribution"], "India");
    assert_eq!(
        json["ayurvedic_use"],
        "Neem treats acne and has anti-inflammatory properties."
    );

    let image_url = json["image_url"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with("_neem.jpg"));

    // the returned URL is served by the same router
    let served = app
        .oneshot(Request::builder().uri(image_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    let bytes = served.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"jpeg-bytes");
}

#[tokio::test]
async fn test_identify_keeps_profile_when_storage_fails() {
    let server = MockServer::start();
    mock_aloe(&server);
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("uploads");
    std::fs::write(&blocker, b"a regular file, not a directory").unwrap();

    let response = router_with_storage(&server, &blocker)
        .oneshot(multipart_request("file", "aloe.jpg", b"jpeg-bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["scientific_name"], "Aloe vera");
    assert_eq!(json["common_name"], "Aloe");
    assert_eq!(json["confidence"], "91.00%");
    assert!(json.get("image_url").is_none());
}

#[tokio::test]
async fn test_identify_without_file_part() {
    let server = MockServer::start();
    let uploads = TempDir::new().unwrap();

    let response = router(&server, &uploads)
        .oneshot(multipart_request("photo", "leaf.jpg", b"jpeg-bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, serde_json::json!({"error": "No file part"}));
}

#[tokio::test]
async fn test_identify_with_empty_filename() {
    let server = MockServer::start();
    let uploads = TempDir::new().unwrap();

    let response = router(&server, &uploads)
        .oneshot(multipart_request("file", "", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"error": "No selected file"})
    );
}

#[tokio::test]
async fn test_identify_non_multipart_request() {
    let server = MockServer::start();
    let uploads = TempDir::new().unwrap();

    let response = router(&server, &uploads)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/identify")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_identify_no_plant() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v2/identify/all");
        then.status(200).json_body(serde_json::json!({"results": []}));
    });
    let uploads = TempDir::new().unwrap();

    let response = router(&server, &uploads)
        .oneshot(multipart_request("file", "rock.jpg", b"jpeg-bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"error": "No plant identified."})
    );
    // nothing stored for a failed identification
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_identify_upstream_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v2/identify/all");
        then.status(401);
    });
    let uploads = TempDir::new().unwrap();

    let response = router(&server, &uploads)
        .oneshot(multipart_request("file", "leaf.jpg", b"jpeg-bytes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({"error": "API error: 401"})
    );
}
