//! Authentication types for the domain layer.
//!
//! These types describe the caller of a request once the session layer has
//! resolved their Plex token. Any validator can populate them via the
//! `SessionValidator` port.

use super::PlexUserId;
use thiserror::Error;

/// Authenticated Plex account behind the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Plex account id.
    pub id: PlexUserId,

    /// Plex account uuid.
    pub uuid: String,

    pub username: String,

    /// Account email; Plex accounts created through some providers have none.
    pub email: Option<String>,

    /// True iff `id` matches the configured server owner.
    pub is_admin: bool,
}

impl AuthenticatedUser {
    pub fn new(
        id: PlexUserId,
        uuid: impl Into<String>,
        username: impl Into<String>,
        email: Option<String>,
        is_admin: bool,
    ) -> Self {
        Self {
            id,
            uuid: uuid.into(),
            username: username.into(),
            email,
            is_admin,
        }
    }

    /// Returns the email if present and non-blank.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or was rejected by Plex.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// User exists but lacks required permissions for this action.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Plex could not be reached.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken)
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
