//! HTTP handlers for invite code endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{RequireAdmin, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::invites::{
    ClaimInviteCodeCommand, CreateInviteCodeCommand, DisableInviteCodeCommand, GetInviteCodeQuery,
    ListInviteCodesQuery,
};
use crate::domain::foundation::InviteCodeId;

use super::dto::{
    ClaimInviteCodeRequest, ClaimInviteCodeResponse, CreateInviteCodeRequest,
    InviteCodeDetailResponse, InviteCodeListResponse, InviteCodeResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Admin endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/codes - Create an invite code
pub async fn create_invite_code(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(request): Json<CreateInviteCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.create_invite_code_handler();
    let cmd = CreateInviteCodeCommand {
        code: request.code,
        max_uses: request.max_uses,
        expires_at: request.expires_at,
        entitlement_name: request.entitlement_name,
        duration: request.duration,
    };

    let code = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(InviteCodeResponse::created(code))))
}

/// GET /api/v1/codes - List codes that are not disabled
pub async fn list_invite_codes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let codes = state
        .list_invite_codes_handler()
        .handle(ListInviteCodesQuery)
        .await?;

    Ok(Json(InviteCodeListResponse::from(codes)))
}

/// GET /api/v1/codes/:id - Code detail with its redeemers
pub async fn get_invite_code(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .get_invite_code_handler()
        .handle(GetInviteCodeQuery {
            id: InviteCodeId::new(id),
        })
        .await?;

    Ok(Json(InviteCodeDetailResponse::from(result)))
}

/// DELETE /api/v1/codes/:id - Disable a code
///
/// Repeating the call on a disabled code succeeds.
pub async fn disable_invite_code(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .disable_invite_code_handler()
        .handle(DisableInviteCodeCommand {
            id: InviteCodeId::new(id),
        })
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Invite code disabled"
    })))
}

// ════════════════════════════════════════════════════════════════════════════════
// User endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/codes/claim - Redeem a code and share the libraries
pub async fn claim_invite_code(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ClaimInviteCodeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ClaimInviteCodeCommand {
        code: request.code,
        user,
    };

    let result = state.claim_invite_code_handler().handle(cmd).await?;

    Ok(Json(ClaimInviteCodeResponse::from(result)))
}
