#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Messages are surfaced verbatim: the audience is a single operator-user,
/// and the raw underlying error is the most useful thing to show them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("PDF text extraction is not available in this build")]
    ExtractionUnavailable,

    #[error("PDF text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("No API credential configured (mount a secret file or set OPENAI_API_KEY)")]
    CredentialMissing,

    #[error("Completion client is not available in this build")]
    ClientUnavailable,

    #[error("Completion request failed: {0}")]
    RequestFailed(String),

    #[error("Model did not return a parseable JSON object")]
    InvalidResponseFormat { raw: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::CredentialMissing => AppError::CredentialMissing,
            other => AppError::RequestFailed(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::ExtractionUnavailable => {
                (StatusCode::NOT_IMPLEMENTED, "EXTRACTION_UNAVAILABLE")
            }
            AppError::ExtractionFailed(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
            }
            AppError::CredentialMissing => (StatusCode::SERVICE_UNAVAILABLE, "CREDENTIAL_MISSING"),
            AppError::ClientUnavailable => (StatusCode::NOT_IMPLEMENTED, "CLIENT_UNAVAILABLE"),
            AppError::RequestFailed(msg) => {
                tracing::error!("Completion request failed: {msg}");
                (StatusCode::BAD_GATEWAY, "REQUEST_FAILED")
            }
            AppError::InvalidResponseFormat { .. } => {
                tracing::error!("Model returned unparseable output");
                (StatusCode::BAD_GATEWAY, "INVALID_RESPONSE_FORMAT")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // InvalidResponseFormat additionally carries the raw model output so
        // the operator can see what the model actually said.
        let body = match &self {
            AppError::InvalidResponseFormat { raw } => Json(json!({
                "error": {
                    "code": code,
                    "message": self.to_string(),
                    "raw": raw
                }
            })),
            _ => Json(json!({
                "error": {
                    "code": code,
                    "message": self.to_string()
                }
            })),
        };

        (status, body).into_response()
    }
}
