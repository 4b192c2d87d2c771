//! Invite domain module.
//!
//! Invite codes, their validity rules, and redemption records.

mod code;
mod invite_code;
mod redemption;

pub use code::{generate_code, validate_code, DEFAULT_CODE_LENGTH};
pub use invite_code::{InviteCode, InviteCodeStatus, NewInviteCode, RedemptionBlock};
pub use redemption::{InviteRedemption, PlexUserInvite, Redeemer, UserInviteDetail};
