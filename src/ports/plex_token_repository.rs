//! Plex token repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlexUserId};
use crate::domain::users::PlexToken;

/// Stores one Plex auth token per user.
#[async_trait]
pub trait PlexTokenRepository: Send + Sync {
    /// Insert or replace the user's token. The user record must exist.
    async fn upsert(&self, token: &PlexToken) -> Result<(), DomainError>;

    async fn find_by_user(&self, user_id: PlexUserId) -> Result<Option<PlexToken>, DomainError>;
}
