//! Stored per-user Plex tokens.

use secrecy::SecretString;

use crate::domain::foundation::{PlexUserId, Timestamp};

/// A user's Plex auth token, captured at login.
///
/// Used to accept pending library shares on the user's behalf.
#[derive(Debug, Clone)]
pub struct PlexToken {
    pub user_id: PlexUserId,
    pub access_token: SecretString,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlexToken {
    pub fn new(user_id: PlexUserId, access_token: impl Into<String>, now: Timestamp) -> Self {
        Self {
            user_id,
            access_token: SecretString::new(access_token.into()),
            created_at: now,
            updated_at: now,
        }
    }
}
