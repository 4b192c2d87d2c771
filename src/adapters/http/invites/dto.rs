//! Request and response bodies for invite code endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::users::AccessOutcomeView;
use crate::application::handlers::invites::{ClaimInviteCodeResult, GetInviteCodeResult};
use crate::domain::foundation::{InviteCodeId, PlexUserId, Timestamp};
use crate::domain::invites::{InviteCode, InviteCodeStatus, Redeemer};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /codes`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateInviteCodeRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub max_uses: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub entitlement_name: Option<String>,
    /// Cutoff recorded on each redemption.
    #[serde(default)]
    pub duration: Option<Timestamp>,
}

/// Body of `POST /codes/claim`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimInviteCodeRequest {
    pub code: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Views
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteCodeView {
    pub id: InviteCodeId,
    pub code: String,
    pub entitlement_name: String,
    pub max_uses: Option<i64>,
    pub used_count: i64,
    pub remaining_uses: Option<i64>,
    pub expires_at: Option<Timestamp>,
    pub duration: Option<Timestamp>,
    pub is_disabled: bool,
    pub status: InviteCodeStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl InviteCodeView {
    pub fn new(code: InviteCode, now: &Timestamp) -> Self {
        Self {
            status: code.status(now),
            remaining_uses: code.remaining_uses(),
            id: code.id,
            code: code.code,
            entitlement_name: code.entitlement_name,
            max_uses: code.max_uses,
            used_count: code.used_count,
            expires_at: code.expires_at,
            duration: code.duration,
            is_disabled: code.is_disabled,
            created_at: code.created_at,
            updated_at: code.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedeemerView {
    pub user_id: PlexUserId,
    pub username: String,
    pub email: String,
    pub used_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

impl From<Redeemer> for RedeemerView {
    fn from(redeemer: Redeemer) -> Self {
        Self {
            user_id: redeemer.user.id,
            username: redeemer.user.username,
            email: redeemer.user.email,
            used_at: redeemer.used_at,
            expires_at: redeemer.expires_at,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteCodeResponse {
    pub status: String,
    pub message: String,
    pub invite_code: InviteCodeView,
}

impl InviteCodeResponse {
    pub fn created(code: InviteCode) -> Self {
        Self {
            status: "success".to_string(),
            message: "Invite code created".to_string(),
            invite_code: InviteCodeView::new(code, &Timestamp::now()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteCodeListResponse {
    pub status: String,
    pub invite_codes: Vec<InviteCodeView>,
}

impl From<Vec<InviteCode>> for InviteCodeListResponse {
    fn from(codes: Vec<InviteCode>) -> Self {
        let now = Timestamp::now();
        Self {
            status: "success".to_string(),
            invite_codes: codes
                .into_iter()
                .map(|code| InviteCodeView::new(code, &now))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteCodeDetailResponse {
    pub status: String,
    pub invite_code: InviteCodeView,
    pub users: Vec<RedeemerView>,
}

impl From<GetInviteCodeResult> for InviteCodeDetailResponse {
    fn from(result: GetInviteCodeResult) -> Self {
        Self {
            status: "success".to_string(),
            invite_code: InviteCodeView::new(result.invite_code, &Timestamp::now()),
            users: result.redeemers.into_iter().map(RedeemerView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimInviteCodeResponse {
    pub status: String,
    pub message: String,
    pub invite_code: InviteCodeView,
    pub access: AccessOutcomeView,
}

impl From<ClaimInviteCodeResult> for ClaimInviteCodeResponse {
    fn from(result: ClaimInviteCodeResult) -> Self {
        Self {
            status: "success".to_string(),
            message: "Invite code claimed".to_string(),
            invite_code: InviteCodeView::new(result.invite_code, &Timestamp::now()),
            access: AccessOutcomeView::from(result.outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invites::NewInviteCode;

    fn code(max_uses: Option<i64>, used_count: i64) -> InviteCode {
        let mut code = NewInviteCode::new("WELCOME".into(), "plex".into(), max_uses, None, None)
            .unwrap()
            .into_invite_code(InviteCodeId::new(3), Timestamp::now());
        code.used_count = used_count;
        code
    }

    #[test]
    fn view_reports_remaining_uses_and_status() {
        let view = InviteCodeView::new(code(Some(2), 1), &Timestamp::now());

        assert_eq!(view.remaining_uses, Some(1));
        assert_eq!(view.status, InviteCodeStatus::Active);
    }

    #[test]
    fn exhausted_code_view_is_exhausted() {
        let view = InviteCodeView::new(code(Some(1), 1), &Timestamp::now());

        assert_eq!(view.remaining_uses, Some(0));
        assert_eq!(view.status, InviteCodeStatus::Exhausted);
    }

    #[test]
    fn create_request_accepts_empty_body() {
        let request: CreateInviteCodeRequest = serde_json::from_str("{}").unwrap();

        assert!(request.code.is_none());
        assert!(request.max_uses.is_none());
    }

    #[test]
    fn create_request_parses_rfc3339_dates() {
        let request: CreateInviteCodeRequest = serde_json::from_str(
            r#"{"max_uses": 5, "expires_at": "2030-01-01T00:00:00Z", "duration": "2030-06-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(request.max_uses, Some(5));
        assert!(request.expires_at.is_some());
        assert!(request.duration.is_some());
    }
}
