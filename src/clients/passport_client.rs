//! Cliente HTTP para el backend de pasaportes
//!
//! Dos llamadas de solo lectura: `GET /passports/{vin}` y
//! `GET /verify?vin={vin}`. Sin reintentos: cualquier fallo se devuelve
//! tal cual a quien llama.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::models::passport::{PassportRecord, VerifyResponse};

/// Header de autenticación del backend
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Errores del backend de pasaportes
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{}", status_message(.status, .reason, .body))]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Request to passport backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response from passport backend: {0}")]
    Decode(String),
}

fn status_message(status: &u16, reason: &str, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("{} {}", status, reason)
    } else {
        format!("{} {}: {}", status, reason, body)
    }
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Status { status: 404, .. })
    }
}

/// Capacidad de lectura sobre el backend, inyectada en el estado de la app
#[async_trait]
pub trait PassportBackend: Send + Sync {
    async fn get_passport(&self, vin: &str) -> Result<PassportRecord, BackendError>;

    async fn verify_passport(&self, vin: &str) -> Result<VerifyResponse, BackendError>;
}

/// Implementación con reqwest
#[derive(Debug, Clone)]
pub struct HttpPassportClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpPassportClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vehicle-passport/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, BackendError> {
        log::debug!("🌐 GET {}", url);

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("❌ Passport backend unreachable: {}", e);
            BackendError::Transport(e)
        })?;

        let status = response.status();
        log::debug!("📡 Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND {
                log::info!("🔍 Passport backend returned 404 for {}", url);
            } else {
                log::error!("❌ Passport backend failed with status {}: {}", status, body);
            }
            return Err(BackendError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            log::error!("❌ Failed to parse passport backend response: {}", e);
            BackendError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl PassportBackend for HttpPassportClient {
    async fn get_passport(&self, vin: &str) -> Result<PassportRecord, BackendError> {
        log::info!("📄 Fetching passport for VIN {}", vin);
        let url = format!("{}/passports/{}", self.base_url, urlencoding::encode(vin));
        self.get_json(&url).await
    }

    async fn verify_passport(&self, vin: &str) -> Result<VerifyResponse, BackendError> {
        log::info!("🔐 Verifying passport seal for VIN {}", vin);
        let url = format!("{}/verify?vin={}", self.base_url, urlencoding::encode(vin));
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = BackendError::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "500 Internal Server Error: boom");
        assert!(!err.is_not_found());

        let not_found = BackendError::Status {
            status: 404,
            reason: "Not Found".to_string(),
            body: "  ".to_string(),
        };
        assert_eq!(not_found.to_string(), "404 Not Found");
        assert!(not_found.is_not_found());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client =
            HttpPassportClient::new("http://localhost:8080/api/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }
}
