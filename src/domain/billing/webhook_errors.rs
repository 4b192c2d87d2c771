//! Webhook error types for Stripe webhook handling.
//!
//! Status codes drive Stripe's retry behavior: any non-2xx response is
//! redelivered with backoff, so only failures that a retry can fix map to 5xx.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::access::AccessError;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The Stripe-Signature header was not sent.
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Event was intentionally ignored (not an error condition).
    #[error("Event ignored: {0}")]
    Ignored(String),

    /// Customer could not be mapped to a Plex identity.
    #[error("Identity resolution failed: {0}")]
    IdentityResolution(String),

    /// Plex share or unshare failed.
    #[error("Media provider error: {0}")]
    Provider(String),

    /// Stripe customer lookup failed.
    #[error("Billing provider error: {0}")]
    Billing(String),

    /// Access directory operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if Stripe should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::IdentityResolution(_)
                | WebhookError::Provider(_)
                | WebhookError::Billing(_)
                | WebhookError::Database(_)
        )
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Verification and payload problems - redelivery cannot help
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,

            // Ignored events are acknowledged as success
            WebhookError::Ignored(_) => StatusCode::OK,

            // Metadata must be fixed out-of-band, then the retry succeeds
            WebhookError::IdentityResolution(_) => StatusCode::UNPROCESSABLE_ENTITY,

            WebhookError::Provider(_) | WebhookError::Billing(_) | WebhookError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for response bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::TimestampOutOfRange => "TIMESTAMP_OUT_OF_RANGE",
            WebhookError::InvalidTimestamp => "INVALID_TIMESTAMP",
            WebhookError::ParseError(_) => "INVALID_PAYLOAD",
            WebhookError::Ignored(_) => "IGNORED",
            WebhookError::IdentityResolution(_) => "IDENTITY_RESOLUTION_FAILED",
            WebhookError::Provider(_) => "MEDIA_PROVIDER_ERROR",
            WebhookError::Billing(_) => "BILLING_PROVIDER_ERROR",
            WebhookError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<AccessError> for WebhookError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::IdentityResolution { .. } => {
                WebhookError::IdentityResolution(err.message())
            }
            AccessError::Validation { .. } => WebhookError::ParseError(err.message()),
            AccessError::Provider(_) => WebhookError::Provider(err.message()),
            AccessError::Billing(_) => WebhookError::Billing(err.message()),
            AccessError::Forbidden(_) => WebhookError::Ignored(err.message()),
            AccessError::InvalidOrExpired | AccessError::NotFound { .. } => {
                WebhookError::Database(err.message())
            }
            AccessError::Storage(_) => WebhookError::Database(err.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verification_failures_return_bad_request() {
        for err in [
            WebhookError::MissingSignature,
            WebhookError::InvalidSignature,
            WebhookError::TimestampOutOfRange,
            WebhookError::InvalidTimestamp,
            WebhookError::ParseError("bad json".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", err);
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn ignored_returns_ok() {
        let err = WebhookError::Ignored("invoice.paid".to_string());
        assert_eq!(err.status_code(), StatusCode::OK);
        assert!(!err.is_retryable());
    }

    #[test]
    fn identity_resolution_returns_unprocessable() {
        let err = WebhookError::IdentityResolution("no plex_user_id".into());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.is_retryable());
    }

    #[test]
    fn upstream_failures_return_internal_error() {
        for err in [
            WebhookError::Provider("502".into()),
            WebhookError::Billing("timeout".into()),
            WebhookError::Database("locked".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(err.is_retryable());
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Conversion Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn access_errors_convert_to_matching_webhook_errors() {
        assert!(matches!(
            WebhookError::from(AccessError::identity_resolution("cus_1", "no email")),
            WebhookError::IdentityResolution(_)
        ));
        assert!(matches!(
            WebhookError::from(AccessError::provider("401")),
            WebhookError::Provider(_)
        ));
        assert!(matches!(
            WebhookError::from(AccessError::billing("down")),
            WebhookError::Billing(_)
        ));
        assert!(matches!(
            WebhookError::from(AccessError::storage("disk full")),
            WebhookError::Database(_)
        ));
    }

    #[test]
    fn displays_reason() {
        let err = WebhookError::Ignored("unhandled event type invoice.paid".to_string());
        assert_eq!(
            format!("{}", err),
            "Event ignored: unhandled event type invoice.paid"
        );
    }
}
