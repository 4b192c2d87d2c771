//! Plex user handlers.
//!
//! ## Commands
//! - Record a login (user and token)
//! - Grant, revoke, delete (administrator)
//! - Update notes (administrator)
//!
//! ## Queries
//! - List users with live access flags
//! - Get a user, list a user's redemptions
//! - Check the caller's access

mod check_access;
mod delete_user;
mod get_user;
mod grant_access;
mod list_user_invites;
mod list_users;
mod record_login;
mod revoke_access;
mod update_notes;

// Commands
pub use delete_user::{DeleteUserCommand, DeleteUserHandler};
pub use grant_access::{GrantAccessCommand, GrantAccessHandler};
pub use record_login::{RecordLoginCommand, RecordLoginHandler};
pub use revoke_access::{RevokeAccessCommand, RevokeAccessHandler};
pub use update_notes::{UpdateNotesCommand, UpdateNotesHandler};

// Queries
pub use check_access::{CheckAccessHandler, CheckAccessQuery};
pub use get_user::{GetUserHandler, GetUserQuery};
pub use list_user_invites::{ListUserInvitesHandler, ListUserInvitesQuery, UserInviteView};
pub use list_users::{ListUsersHandler, ListUsersQuery, UserWithAccess};
