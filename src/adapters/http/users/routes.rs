//! Axum router configuration for user and access endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    check_access, current_user, delete_user, get_user, grant_access, list_user_invites,
    list_users, record_login, revoke_access, update_notes,
};

/// Create the user router.
///
/// # Routes
///
/// ## Caller Endpoints
/// - `POST /user/login` - Record the caller and their Plex token
/// - `GET /user/me` - The resolved caller, or `authenticated: false`
/// - `GET /plex/check-access` - Whether the caller is on the share list
///
/// ## Admin Endpoints
/// - `GET /plex/users` - Users with live access flags
/// - `POST /plex/users/grant` - Share with a known user
/// - `GET /plex/users/:id` - One user
/// - `DELETE /plex/users/:id` - Unshare and forget a user
/// - `GET /plex/users/:id/invites` - A user's redemptions
/// - `POST /plex/users/:id/revoke` - Unshare
/// - `PUT /plex/users/:id/notes` - Replace the operator's notes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/login", post(record_login))
        .route("/user/me", get(current_user))
        .route("/plex/check-access", get(check_access))
        .route("/plex/users", get(list_users))
        .route("/plex/users/grant", post(grant_access))
        .route("/plex/users/:id", get(get_user).delete(delete_user))
        .route("/plex/users/:id/invites", get(list_user_invites))
        .route("/plex/users/:id/revoke", post(revoke_access))
        .route("/plex/users/:id/notes", put(update_notes))
}
