//! Invite redemption records.

use serde::Serialize;

use crate::domain::foundation::{InviteCodeId, PlexUserId, Timestamp};
use crate::domain::users::PlexUserRecord;

/// One user's use of one code. Unique per (user, code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlexUserInvite {
    pub id: i64,
    pub user_id: PlexUserId,
    pub invite_code_id: InviteCodeId,
    pub used_at: Timestamp,
    /// Copied from the code's `duration` at redemption time.
    pub expires_at: Option<Timestamp>,
}

impl PlexUserInvite {
    /// True while the grant is unbounded or its cutoff lies in the future.
    pub fn is_active(&self, now: &Timestamp) -> bool {
        self.expires_at
            .as_ref()
            .map_or(true, |expires_at| now.is_before(expires_at))
    }
}

/// Input for the atomic redemption write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteRedemption {
    pub user_id: PlexUserId,
    pub invite_code_id: InviteCodeId,
    pub used_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

/// A redemption joined with the code it used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInviteDetail {
    pub invite: PlexUserInvite,
    pub code: String,
    pub entitlement_name: String,
}

/// A user who redeemed a given code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redeemer {
    pub user: PlexUserRecord,
    pub used_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}
