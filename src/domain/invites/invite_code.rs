//! Invite code entity and its redemption predicate.
//!
//! There is no stored "expired" state: validity is recomputed from the
//! disabled flag, both time cutoffs and the use counter on every check.
//! Both cutoffs are exclusive, so a code whose `expires_at` equals `now`
//! is already expired.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{InviteCodeId, Timestamp, ValidationError};

/// A stored invite code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteCode {
    pub id: InviteCodeId,
    pub code: String,
    pub entitlement_name: String,
    pub max_uses: Option<i64>,
    pub used_count: i64,
    pub expires_at: Option<Timestamp>,
    /// Absolute cutoff bounding the lifetime of access granted through this code.
    pub duration: Option<Timestamp>,
    pub is_disabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Why a code cannot be redeemed. Logged, never shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionBlock {
    Disabled,
    Expired,
    DurationElapsed,
    Exhausted,
}

impl std::fmt::Display for RedemptionBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RedemptionBlock::Disabled => "disabled",
            RedemptionBlock::Expired => "expired",
            RedemptionBlock::DurationElapsed => "duration elapsed",
            RedemptionBlock::Exhausted => "exhausted",
        };
        write!(f, "{}", s)
    }
}

/// Presentation status of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteCodeStatus {
    Active,
    Disabled,
    Expired,
    Exhausted,
}

impl InviteCode {
    /// Checks whether the code can be redeemed at `now`.
    pub fn redemption_check(&self, now: &Timestamp) -> Result<(), RedemptionBlock> {
        if self.is_disabled {
            return Err(RedemptionBlock::Disabled);
        }
        if let Some(expires_at) = &self.expires_at {
            if !now.is_before(expires_at) {
                return Err(RedemptionBlock::Expired);
            }
        }
        if let Some(duration) = &self.duration {
            if !now.is_before(duration) {
                return Err(RedemptionBlock::DurationElapsed);
            }
        }
        if let Some(max_uses) = self.max_uses {
            if self.used_count >= max_uses {
                return Err(RedemptionBlock::Exhausted);
            }
        }
        Ok(())
    }

    pub fn is_redeemable(&self, now: &Timestamp) -> bool {
        self.redemption_check(now).is_ok()
    }

    pub fn status(&self, now: &Timestamp) -> InviteCodeStatus {
        match self.redemption_check(now) {
            Ok(()) => InviteCodeStatus::Active,
            Err(RedemptionBlock::Disabled) => InviteCodeStatus::Disabled,
            Err(RedemptionBlock::Expired) | Err(RedemptionBlock::DurationElapsed) => {
                InviteCodeStatus::Expired
            }
            Err(RedemptionBlock::Exhausted) => InviteCodeStatus::Exhausted,
        }
    }

    /// Remaining uses, `None` when unlimited.
    pub fn remaining_uses(&self) -> Option<i64> {
        self.max_uses.map(|max| (max - self.used_count).max(0))
    }
}

/// A validated invite code ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInviteCode {
    pub code: String,
    pub entitlement_name: String,
    pub max_uses: Option<i64>,
    pub expires_at: Option<Timestamp>,
    pub duration: Option<Timestamp>,
}

impl NewInviteCode {
    /// Builds a new code, rejecting a non-positive `max_uses`.
    pub fn new(
        code: String,
        entitlement_name: String,
        max_uses: Option<i64>,
        expires_at: Option<Timestamp>,
        duration: Option<Timestamp>,
    ) -> Result<Self, ValidationError> {
        if let Some(max) = max_uses {
            if max < 1 {
                return Err(ValidationError::out_of_range("max_uses", 1, i64::MAX, max));
            }
        }
        if entitlement_name.trim().is_empty() {
            return Err(ValidationError::empty_field("entitlement_name"));
        }
        Ok(Self {
            code,
            entitlement_name,
            max_uses,
            expires_at,
            duration,
        })
    }

    /// Materializes the stored record once the directory assigned an id.
    pub fn into_invite_code(self, id: InviteCodeId, now: Timestamp) -> InviteCode {
        InviteCode {
            id,
            code: self.code,
            entitlement_name: self.entitlement_name,
            max_uses: self.max_uses,
            used_count: 0,
            expires_at: self.expires_at,
            duration: self.duration,
            is_disabled: false,
            created_at: now,
            updated_at: now,
        }
    }
}
