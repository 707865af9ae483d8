//! Flow-level error taxonomy and its HTTP mapping
//!
//! Failures collapse into two families: required input was missing or
//! invalid, or the external call failed. Both are reported to the client as
//! a JSON error body.

use crate::core::constants::error_type;
use crate::core::provider::ProviderError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("API key is required")]
    MissingApiKey,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Model returned malformed output: {0}")]
    MalformedOutput(String),

    #[error("Image generation failed.")]
    ImageGenerationFailed,

    #[error("Maintenance task {0} not found")]
    TaskNotFound(u64),
}

pub type FlowResult<T> = std::result::Result<T, FlowError>;

impl FlowError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        FlowError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Status code and error type tag reported to the client
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            FlowError::Validation { .. } | FlowError::MissingApiKey => {
                (StatusCode::BAD_REQUEST, error_type::INVALID_REQUEST)
            }
            FlowError::TaskNotFound(_) => (StatusCode::NOT_FOUND, error_type::NOT_FOUND),
            FlowError::Provider(ProviderError::Authentication(_)) => {
                (StatusCode::UNAUTHORIZED, error_type::AUTHENTICATION)
            }
            FlowError::Provider(ProviderError::RateLimit(_)) => {
                (StatusCode::TOO_MANY_REQUESTS, error_type::RATE_LIMIT)
            }
            FlowError::Provider(ProviderError::BadRequest(_)) => {
                (StatusCode::BAD_REQUEST, error_type::INVALID_REQUEST)
            }
            FlowError::Provider(_)
            | FlowError::MalformedOutput(_)
            | FlowError::ImageGenerationFailed => (StatusCode::BAD_GATEWAY, error_type::API),
        }
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();
        let body = json!({
            "type": "error",
            "error": {
                "type": kind,
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for FlowError {
    fn from(rejection: JsonRejection) -> Self {
        FlowError::validation("body", rejection.body_text())
    }
}

/// Reject a value that is empty after trimming
pub fn require(field: &str, value: &str) -> FlowResult<()> {
    if value.trim().is_empty() {
        return Err(FlowError::validation(field, "is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("vehicle_model", "   ").is_err());
        assert!(require("vehicle_model", "").is_err());
        assert!(require("vehicle_model", "Komatsu PC200-8").is_ok());
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = require("error_code", "").unwrap_err();
        assert_eq!(err.to_string(), "error_code: is required");
    }

    #[test]
    fn test_classify_statuses() {
        assert_eq!(FlowError::MissingApiKey.classify().0, StatusCode::BAD_REQUEST);
        assert_eq!(FlowError::TaskNotFound(3).classify().0, StatusCode::NOT_FOUND);
        assert_eq!(
            FlowError::Provider(ProviderError::Authentication("bad key".into()))
                .classify()
                .0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            FlowError::ImageGenerationFailed.classify(),
            (StatusCode::BAD_GATEWAY, error_type::API)
        );
    }
}
