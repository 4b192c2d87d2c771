//! Error bodies and the mapping from access errors to HTTP statuses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::access::AccessError;
use crate::domain::billing::WebhookError;

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Access errors
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts access errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub AccessError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AccessError::Validation { .. } | AccessError::InvalidOrExpired => {
                StatusCode::BAD_REQUEST
            }
            AccessError::IdentityResolution { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AccessError::NotFound { .. } => StatusCode::NOT_FOUND,
            AccessError::Forbidden(_) => StatusCode::FORBIDDEN,
            AccessError::Provider(_) | AccessError::Billing(_) => StatusCode::BAD_GATEWAY,
            AccessError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        }

        let body = match &self.0 {
            AccessError::Validation { field, .. } => ErrorResponse::with_details(
                self.0.code().to_string(),
                self.0.message(),
                serde_json::json!({ "field": field }),
            ),
            // Storage detail stays in the logs
            AccessError::Storage(_) => {
                ErrorResponse::new(self.0.code().to_string(), "Internal server error")
            }
            err => ErrorResponse::new(err.code().to_string(), err.message()),
        };
        (status, Json(body)).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook errors
// ════════════════════════════════════════════════════════════════════════════════

/// Webhook failure response. Stripe retries every non-2xx status.
#[derive(Debug)]
pub struct WebhookApiError(pub WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if let WebhookError::Ignored(reason) = &self.0 {
            return (
                status,
                Json(serde_json::json!({ "status": "ignored", "reason": reason })),
            )
                .into_response();
        }

        let body = ErrorResponse::new(self.0.error_code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}
