//! HTTP handlers for user endpoints.

use axum::extract::{Json, Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use secrecy::SecretString;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{bearer_token, OptionalAuth, RequireAdmin, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::users::{
    CheckAccessQuery, DeleteUserCommand, GetUserQuery, GrantAccessCommand, ListUserInvitesQuery,
    ListUsersQuery, RecordLoginCommand, RevokeAccessCommand, UpdateNotesCommand,
};
use crate::domain::access::AccessError;
use crate::domain::foundation::PlexUserId;

use super::dto::{
    AccessOutcomeView, CheckAccessResponse, CurrentUserResponse, GrantAccessRequest,
    PlexUserView, UpdateNotesRequest, UserInviteResponseView, UserWithAccessView,
};

fn path_user_id(raw: i64) -> Result<PlexUserId, ApiError> {
    PlexUserId::new(raw).map_err(|e| ApiError(AccessError::from(e)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Caller endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/user/login - Remember the caller and their Plex token
pub async fn record_login(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    // The middleware only injects a user after resolving this header
    let token = bearer_token(&headers)
        .ok_or_else(|| AccessError::validation("authorization", "Bearer token is required"))?;

    let cmd = RecordLoginCommand {
        user,
        token: SecretString::new(token.to_string()),
    };
    let record = state.record_login_handler().handle(cmd).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "user": PlexUserView::from(record),
    })))
}

/// GET /api/v1/user/me - The resolved caller, if any
pub async fn current_user(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    Json(CurrentUserResponse::from(user))
}

/// GET /api/v1/plex/check-access - Whether the caller can see the libraries
pub async fn check_access(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let has_access = state
        .check_access_handler()
        .handle(CheckAccessQuery { user_id: user.id })
        .await?;

    Ok(Json(CheckAccessResponse::new(has_access)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin queries
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/v1/plex/users - Every known user with a live access flag
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.list_users_handler().handle(ListUsersQuery).await?;

    let users: Vec<UserWithAccessView> = users.into_iter().map(UserWithAccessView::from).collect();
    Ok(Json(serde_json::json!({ "status": "success", "users": users })))
}

/// GET /api/v1/plex/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = path_user_id(id)?;
    let record = state
        .get_user_handler()
        .handle(GetUserQuery { user_id })
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "user": PlexUserView::from(record),
    })))
}

/// GET /api/v1/plex/users/:id/invites - Redemptions by one user
pub async fn list_user_invites(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = path_user_id(id)?;
    let invites = state
        .list_user_invites_handler()
        .handle(ListUserInvitesQuery { user_id })
        .await?;

    let invites: Vec<UserInviteResponseView> = invites
        .into_iter()
        .map(UserInviteResponseView::from)
        .collect();
    Ok(Json(serde_json::json!({ "status": "success", "invites": invites })))
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin commands
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/plex/users/grant - Share with a known user's stored email
pub async fn grant_access(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<GrantAccessRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = path_user_id(request.user_id)?;
    let outcome = state
        .grant_access_handler()
        .handle(GrantAccessCommand {
            user_id,
            admin_id: admin.id,
        })
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Access granted",
        "user_id": user_id,
        "access": AccessOutcomeView::from(outcome),
    })))
}

/// POST /api/v1/plex/users/:id/revoke - Remove a user's share
pub async fn revoke_access(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = path_user_id(id)?;
    state
        .revoke_access_handler()
        .handle(RevokeAccessCommand {
            user_id,
            admin_id: admin.id,
        })
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Access revoked",
        "user_id": user_id,
    })))
}

/// DELETE /api/v1/plex/users/:id - Unshare, then forget the user
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = path_user_id(id)?;
    state
        .delete_user_handler()
        .handle(DeleteUserCommand {
            user_id,
            admin_id: admin.id,
        })
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "User deleted",
    })))
}

/// PUT /api/v1/plex/users/:id/notes
pub async fn update_notes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = path_user_id(id)?;
    state
        .update_notes_handler()
        .handle(UpdateNotesCommand {
            user_id,
            notes: request.notes,
        })
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Notes updated",
    })))
}
