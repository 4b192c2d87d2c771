//! Session validation port.
//!
//! Resolves the bearer credential of a request into the caller's identity.
//! Requests without a credential are anonymous and never reach the
//! validator. The production implementation asks plex.tv who owns the token.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidToken` for tokens the provider rejects
/// - Return `AuthError::ServiceUnavailable` for transient errors
/// - Set `is_admin` only for the configured server owner
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a token and return the authenticated user.
    ///
    /// * `token` - The raw token (without "Bearer " prefix)
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
