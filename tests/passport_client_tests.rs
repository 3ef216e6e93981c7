use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use vehicle_passport::clients::{BackendError, HttpPassportClient, PassportBackend};

const VIN: &str = "WDD2040082R088866";

async fn passport(Path(vin): Path<String>, headers: HeaderMap) -> impl IntoResponse {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
        return (StatusCode::UNAUTHORIZED, "missing api key").into_response();
    }
    match vin.as_str() {
        VIN => Json(json!({
            "vin": VIN,
            "updatedAt": "2025-01-15T10:30:00Z",
            "sealed": {
                "vin": VIN,
                "seal": { "hash": "abc", "sig": "sig", "key_id": "key-001", "sealed_ts": "2025-01-15T10:30:00Z" }
            }
        }))
        .into_response(),
        "BROKEN" => (StatusCode::OK, "not json").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn verify(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("vin").map(String::as_str) {
        Some(VIN) => Json(json!({ "valid": true })).into_response(),
        Some("WDD 2040082") => Json(json!({ "valid": false, "reasons": ["encoded"] })).into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

/// Backend falso levantado en un puerto libre
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/passports/:vin", get(passport))
        .route("/verify", get(verify));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

async fn client(api_key: Option<&str>) -> HttpPassportClient {
    let base = spawn_backend().await;
    HttpPassportClient::new(&base, api_key.map(str::to_string), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_sealed_passport_with_api_key() {
    let client = client(Some("test-key")).await;
    let record = client.get_passport(VIN).await.unwrap();
    assert!(record.is_sealed());
    assert_eq!(record.sealed.unwrap().seal.key_id, "key-001");
}

#[tokio::test]
async fn test_missing_api_key_surfaces_status() {
    let client = client(None).await;
    let err = client.get_passport(VIN).await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 401, .. }));
    assert_eq!(err.to_string(), "401 Unauthorized: missing api key");
}

#[tokio::test]
async fn test_unknown_vin_is_not_found() {
    let client = client(Some("test-key")).await;
    let err = client.get_passport("XYZ1A2B3C4D5E6789").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let client = client(Some("test-key")).await;
    let err = client.get_passport("BROKEN").await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_verify_encodes_vin() {
    let client = client(None).await;
    assert!(client.verify_passport(VIN).await.unwrap().valid);

    let response = client.verify_passport("WDD 2040082").await.unwrap();
    assert!(!response.valid);
    assert_eq!(response.reasons, Some(vec!["encoded".to_string()]));

    let err = client.verify_passport("other").await.unwrap_err();
    assert_eq!(err.to_string(), "500 Internal Server Error: boom");
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let client = HttpPassportClient::new("http://127.0.0.1:1", None, Duration::from_secs(2)).unwrap();
    let err = client.get_passport(VIN).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
}
