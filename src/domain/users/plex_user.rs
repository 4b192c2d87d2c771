//! Plex user records.

use serde::Serialize;

use crate::domain::foundation::{AuthenticatedUser, PlexUserId, Timestamp};

/// A Plex account that has logged in or redeemed a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlexUserRecord {
    pub id: PlexUserId,
    pub uuid: String,
    pub username: String,
    /// May be empty for accounts without an email.
    pub email: String,
    pub is_admin: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlexUserRecord {
    /// Builds a record from the resolved caller.
    pub fn from_identity(user: &AuthenticatedUser, now: Timestamp) -> Self {
        Self {
            id: user.id,
            uuid: user.uuid.clone(),
            username: user.username.clone(),
            email: user.email().unwrap_or_default().to_string(),
            is_admin: user.is_admin,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The email if non-blank.
    pub fn email(&self) -> Option<&str> {
        Some(self.email.trim()).filter(|e| !e.is_empty())
    }
}
