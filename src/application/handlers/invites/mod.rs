//! Invite code handlers.
//!
//! ## Commands
//! - Create a code (generated or chosen)
//! - Redeem a code, and claim it (redeem plus share)
//! - Disable a code
//!
//! ## Queries
//! - List codes that are not disabled
//! - Get a code with its redeemers

mod claim_invite_code;
mod create_invite_code;
mod disable_invite_code;
mod get_invite_code;
mod list_invite_codes;
mod redeem_invite_code;

// Commands
pub use claim_invite_code::{ClaimInviteCodeCommand, ClaimInviteCodeHandler, ClaimInviteCodeResult};
pub use create_invite_code::{CreateInviteCodeCommand, CreateInviteCodeHandler};
pub use disable_invite_code::{DisableInviteCodeCommand, DisableInviteCodeHandler};
pub use redeem_invite_code::{
    RedeemInviteCodeCommand, RedeemInviteCodeHandler, RedeemInviteCodeResult,
};

// Queries
pub use get_invite_code::{GetInviteCodeHandler, GetInviteCodeQuery, GetInviteCodeResult};
pub use list_invite_codes::{ListInviteCodesHandler, ListInviteCodesQuery};
