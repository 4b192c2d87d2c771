//! HTTP adapter for invite code endpoints.
//!
//! Administrators create, list, inspect and disable codes. Any signed-in
//! Plex user can claim one.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ClaimInviteCodeRequest, ClaimInviteCodeResponse, CreateInviteCodeRequest,
    InviteCodeDetailResponse, InviteCodeListResponse, InviteCodeResponse, InviteCodeView,
    RedeemerView,
};
pub use handlers::{
    claim_invite_code, create_invite_code, disable_invite_code, get_invite_code,
    list_invite_codes,
};
pub use routes::invite_routes;
