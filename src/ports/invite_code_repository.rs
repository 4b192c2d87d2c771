//! Invite code repository port.
//!
//! Part of the access directory. Codes are never physically deleted;
//! disabling is the only way to retire one.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InviteCodeId};
use crate::domain::invites::{InviteCode, InviteRedemption, NewInviteCode, Redeemer};

/// Repository port for invite codes and their redemptions.
#[async_trait]
pub trait InviteCodeRepository: Send + Sync {
    /// Persist a new code and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the code string already exists
    /// - `DatabaseError` on persistence failure
    async fn save(&self, code: &NewInviteCode) -> Result<InviteCode, DomainError>;

    async fn find_by_id(&self, id: InviteCodeId) -> Result<Option<InviteCode>, DomainError>;

    /// Exact, case-sensitive lookup.
    async fn find_by_code(&self, code: &str) -> Result<Option<InviteCode>, DomainError>;

    /// All codes that are not disabled, newest first.
    ///
    /// Expired and exhausted codes are included.
    async fn list_active(&self) -> Result<Vec<InviteCode>, DomainError>;

    /// Set `is_disabled`. Idempotent.
    ///
    /// Returns `false` if no code has this id.
    async fn disable(&self, id: InviteCodeId) -> Result<bool, DomainError>;

    /// Atomically consume one use of a code and record the redemption.
    ///
    /// In one transaction: increments `used_count` only while the code is
    /// enabled and below `max_uses`, then upserts the (user, code) row,
    /// refreshing `used_at` and `expires_at` if it already exists.
    ///
    /// Returns `false` (and writes nothing) if the guarded increment matched
    /// no row. The user record must already exist.
    async fn redeem(&self, redemption: &InviteRedemption) -> Result<bool, DomainError>;

    /// Users who redeemed a code, ordered by username.
    async fn list_redeemers(&self, id: InviteCodeId) -> Result<Vec<Redeemer>, DomainError>;
}
