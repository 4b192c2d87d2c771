//! Plex token session validator.
//!
//! Implements the `SessionValidator` port by asking plex.tv who owns the
//! presented token (`GET /api/v2/user`). The server owner is flagged as
//! admin.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::adapters::plex::PlexMediaClient;
use crate::domain::foundation::{AuthError, AuthenticatedUser, PlexUserId};
use crate::ports::{MediaErrorCode, SessionValidator};

/// Resolves callers from their Plex auth token.
pub struct PlexSessionValidator {
    client: Arc<PlexMediaClient>,
    admin_user_id: PlexUserId,
}

impl PlexSessionValidator {
    pub fn new(client: Arc<PlexMediaClient>, admin_user_id: PlexUserId) -> Self {
        Self {
            client,
            admin_user_id,
        }
    }
}

#[async_trait]
impl SessionValidator for PlexSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let account = self
            .client
            .fetch_account(&SecretString::new(token.to_string()))
            .await
            .map_err(|e| match e.code {
                MediaErrorCode::InvalidCredential => AuthError::InvalidToken,
                MediaErrorCode::UnexpectedStatus if e.status == Some(403) => {
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!(error = %e, "Plex account lookup failed");
                    AuthError::service_unavailable(e.to_string())
                }
            })?;

        let id = PlexUserId::new(account.id).map_err(|_| AuthError::InvalidToken)?;
        let email = account.email.filter(|e| !e.trim().is_empty());

        Ok(AuthenticatedUser::new(
            id,
            account.uuid,
            account.username,
            email,
            id == self.admin_user_id,
        ))
    }
}
