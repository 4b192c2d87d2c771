//! HTTP adapter for Plex user endpoints.
//!
//! - `/user/*` - the caller's own identity and login recording
//! - `/plex/check-access` - whether the caller can see the libraries
//! - `/plex/users/*` - administrator user management

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AccessOutcomeView, CheckAccessResponse, CurrentUserResponse, GrantAccessRequest,
    PlexUserView, UpdateNotesRequest, UserInviteResponseView, UserWithAccessView,
};
pub use handlers::{
    check_access, current_user, delete_user, get_user, grant_access, list_user_invites,
    list_users, record_login, revoke_access, update_notes,
};
pub use routes::user_routes;
