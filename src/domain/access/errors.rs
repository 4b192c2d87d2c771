//! Access provisioning error taxonomy.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | InvalidOrExpired | 400 |
//! | IdentityResolution | 422 |
//! | NotFound | 404 |
//! | Forbidden | 403 |
//! | Provider | 502 |
//! | Billing | 502 |
//! | Storage | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised while turning an entitlement change into a share or unshare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Malformed input.
    Validation { field: String, message: String },

    /// A billing customer could not be mapped to a Plex email or user id.
    IdentityResolution { customer_id: String, reason: String },

    /// Invite code is unknown, disabled, expired or exhausted.
    ///
    /// Deliberately carries no detail so callers cannot probe which codes exist.
    InvalidOrExpired,

    /// A record addressed by id does not exist.
    NotFound { resource: &'static str, id: String },

    /// The action is not allowed for this subject.
    Forbidden(String),

    /// The Plex API failed.
    Provider(String),

    /// The Stripe API failed.
    Billing(String),

    /// The access directory failed.
    Storage(String),
}

impl AccessError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AccessError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn identity_resolution(customer_id: impl Into<String>, reason: impl Into<String>) -> Self {
        AccessError::IdentityResolution {
            customer_id: customer_id.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        AccessError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        AccessError::Forbidden(reason.into())
    }

    pub fn provider(message: impl Into<String>) -> Self {
        AccessError::Provider(message.into())
    }

    pub fn billing(message: impl Into<String>) -> Self {
        AccessError::Billing(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        AccessError::Storage(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AccessError::Validation { .. } => ErrorCode::ValidationFailed,
            AccessError::IdentityResolution { .. } => ErrorCode::IdentityResolutionFailed,
            AccessError::InvalidOrExpired => ErrorCode::InvalidOrExpiredCode,
            AccessError::NotFound { resource, .. } => match *resource {
                "invite_code" => ErrorCode::InviteCodeNotFound,
                _ => ErrorCode::PlexUserNotFound,
            },
            AccessError::Forbidden(_) => ErrorCode::Forbidden,
            AccessError::Provider(_) => ErrorCode::MediaProviderError,
            AccessError::Billing(_) => ErrorCode::BillingProviderError,
            AccessError::Storage(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a caller-facing error message.
    pub fn message(&self) -> String {
        match self {
            AccessError::Validation { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            AccessError::IdentityResolution {
                customer_id,
                reason,
            } => format!(
                "Could not resolve Plex identity for customer {}: {}",
                customer_id, reason
            ),
            AccessError::InvalidOrExpired => "code not found".to_string(),
            AccessError::NotFound { resource, id } => format!("{} not found: {}", resource, id),
            AccessError::Forbidden(reason) => reason.clone(),
            AccessError::Provider(msg) => format!("Plex request failed: {}", msg),
            AccessError::Billing(msg) => format!("Stripe request failed: {}", msg),
            AccessError::Storage(msg) => format!("Storage error: {}", msg),
        }
    }

    /// Returns true if redelivering the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AccessError::Provider(_)
                | AccessError::Billing(_)
                | AccessError::Storage(_)
                | AccessError::IdentityResolution { .. }
        )
    }
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AccessError {}

impl From<DomainError> for AccessError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => AccessError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::InvalidOrExpiredCode => AccessError::InvalidOrExpired,
            ErrorCode::InviteCodeNotFound => AccessError::NotFound {
                resource: "invite_code",
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            ErrorCode::PlexUserNotFound => AccessError::NotFound {
                resource: "plex_user",
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            _ => AccessError::Storage(err.to_string()),
        }
    }
}

impl From<ValidationError> for AccessError {
    fn from(err: ValidationError) -> Self {
        AccessError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<AccessError> for DomainError {
    fn from(err: AccessError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // Code and message
    // ============================================================

    #[test]
    fn invalid_or_expired_is_generic() {
        let err = AccessError::InvalidOrExpired;
        assert_eq!(err.message(), "code not found");
        assert_eq!(err.code(), ErrorCode::InvalidOrExpiredCode);
        assert!(!err.is_retryable());
    }

    #[test]
    fn not_found_maps_resource_to_code() {
        assert_eq!(
            AccessError::not_found("invite_code", 4).code(),
            ErrorCode::InviteCodeNotFound
        );
        assert_eq!(
            AccessError::not_found("plex_user", 9).code(),
            ErrorCode::PlexUserNotFound
        );
        assert_eq!(
            AccessError::not_found("plex_user", 9).message(),
            "plex_user not found: 9"
        );
    }

    #[test]
    fn identity_resolution_names_customer() {
        let err = AccessError::identity_resolution("cus_123", "no email on customer");
        assert!(err.message().contains("cus_123"));
        assert!(err.is_retryable());
    }

    #[test]
    fn external_failures_are_retryable() {
        assert!(AccessError::provider("502").is_retryable());
        assert!(AccessError::billing("timeout").is_retryable());
        assert!(AccessError::storage("locked").is_retryable());
        assert!(!AccessError::forbidden("admin").is_retryable());
        assert!(!AccessError::validation("code", "empty").is_retryable());
    }

    // ============================================================
    // Conversions
    // ============================================================

    #[test]
    fn database_domain_error_becomes_storage() {
        let err: AccessError = DomainError::database("connection reset").into();
        assert!(matches!(err, AccessError::Storage(ref m) if m.contains("connection reset")));
    }

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: AccessError = DomainError::validation("notes", "too long").into();
        assert_eq!(
            err,
            AccessError::Validation {
                field: "notes".into(),
                message: "too long".into()
            }
        );
    }

    #[test]
    fn value_validation_error_converts() {
        let err: AccessError = ValidationError::empty_field("email").into();
        assert!(matches!(err, AccessError::Validation { ref field, .. } if field == "email"));
    }

    #[test]
    fn round_trips_into_domain_error_code() {
        let err: DomainError = AccessError::forbidden("cannot revoke admin").into();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(err.message, "cannot revoke admin");
    }
}
