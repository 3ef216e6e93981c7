//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del servicio
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::clients::BackendError;
use crate::models::EvTableError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::ExternalApi(err.to_string())
    }
}

impl From<EvTableError> for AppError {
    fn from(err: EvTableError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                warn!("⚠️ Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                warn!("⚠️ Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::ExternalApi(msg) => {
                error!("❌ External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "External API Error".to_string(),
                        message: msg.clone(),
                        details: Some(json!({ "external_api_error": msg })),
                        code: Some("EXTERNAL_API_ERROR".to_string()),
                    },
                )
            }

            AppError::Config(msg) => {
                error!("❌ Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Configuration Error".to_string(),
                        message: "The service is misconfigured".to_string(),
                        details: Some(json!({ "config_error": msg })),
                        code: Some("CONFIG_ERROR".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de configuración
pub fn config_error(variable: &str, reason: &str) -> AppError {
    AppError::Config(format!("{}: {}", variable, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::ExternalApi("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                AppError::Validation(validator::ValidationErrors::new()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_backend_error_maps_to_external_api() {
        let err: AppError = BackendError::Status {
            status: 503,
            reason: "Service Unavailable".to_string(),
            body: String::new(),
        }
        .into();
        assert!(matches!(err, AppError::ExternalApi(msg) if msg == "503 Service Unavailable"));
    }
}
