use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{shared::tier::ApiTier, tts::EngineFailure};

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Text too long ({length} characters, max {max})")]
    TextTooLong {
        length: usize,
        max: usize,
        tier: Option<ApiTier>,
    },

    #[error("All synthesis engines failed")]
    EnginesExhausted(Vec<EngineFailure>),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// JSON error body: `{error, details, request_id}`
///
/// `request_id` is filled in by the request id middleware on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error: error.into(),
            details,
            request_id: None,
        }
    }

    /// Render as a response and stash a copy for the request id middleware
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        let mut response = (status, Json(self.clone())).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) | Self::TextTooLong { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::EnginesExhausted(_) | Self::ExternalService(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to the JSON error body.
    ///
    /// Internal errors never leak their message; clients get the request id instead.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            Self::Unauthorized(msg) => {
                ErrorResponse::new("Unauthorized", Some(serde_json::Value::from(msg.as_str())))
            }
            Self::BadRequest(msg) => client_error(msg, "bad_request"),
            Self::PayloadTooLarge(msg) => client_error(msg, "payload_too_large"),
            Self::NotFound(msg) => client_error(msg, "not_found"),
            Self::Conflict(msg) => client_error(msg, "conflict"),
            Self::TextTooLong { length, max, tier } => {
                let error = match tier {
                    Some(tier) => format!(
                        "Text too long (max {} characters for the {} tier)",
                        max, tier
                    ),
                    None => format!("Text too long (max {} characters)", max),
                };
                ErrorResponse::new(
                    error,
                    Some(serde_json::json!({
                        "length": length,
                        "max": max,
                        "tier": tier,
                    })),
                )
            }
            Self::EnginesExhausted(failures) => ErrorResponse::new(
                "TTS generation failed",
                Some(serde_json::json!({ "attempted_engines": failures })),
            ),
            Self::ExternalService(msg) => ErrorResponse::new(
                "Upstream service error",
                Some(serde_json::Value::from(msg.as_str())),
            ),
            Self::Internal(_) => ErrorResponse::new("Internal server error", None),
        }
    }

    /// Attach the caller's tier to a text length rejection
    pub fn with_tier(self, tier: ApiTier) -> Self {
        match self {
            Self::TextTooLong { length, max, .. } => Self::TextTooLong {
                length,
                max,
                tier: Some(tier),
            },
            other => other,
        }
    }
}

fn client_error(message: &str, kind: &str) -> ErrorResponse {
    ErrorResponse::new(
        message,
        Some(serde_json::json!({ "kind": kind, "message": message })),
    )
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        self.to_response().into_response_with_status(status)
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
