//! Plex user repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlexUserId};
use crate::domain::invites::UserInviteDetail;
use crate::domain::users::PlexUserRecord;

/// Repository port for known Plex users.
#[async_trait]
pub trait PlexUserRepository: Send + Sync {
    /// Insert or refresh a user.
    ///
    /// On conflict updates uuid, username, email, is_admin and updated_at.
    /// Notes and created_at are kept.
    async fn upsert(&self, user: &PlexUserRecord) -> Result<(), DomainError>;

    /// Insert the user only if no row with this id exists.
    async fn insert_if_missing(&self, user: &PlexUserRecord) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: PlexUserId) -> Result<Option<PlexUserRecord>, DomainError>;

    /// Case-insensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<PlexUserRecord>, DomainError>;

    /// All users ordered by username.
    async fn list(&self) -> Result<Vec<PlexUserRecord>, DomainError>;

    /// Delete a user, cascading to their token and redemptions.
    ///
    /// Returns `false` if the user did not exist.
    async fn delete(&self, id: PlexUserId) -> Result<bool, DomainError>;

    /// Replace the free-text notes; `None` clears them.
    ///
    /// Returns `false` if the user did not exist.
    async fn update_notes(&self, id: PlexUserId, notes: Option<&str>)
        -> Result<bool, DomainError>;

    /// A user's redemptions joined with the codes, most recent first.
    async fn list_invites(&self, id: PlexUserId) -> Result<Vec<UserInviteDetail>, DomainError>;
}
