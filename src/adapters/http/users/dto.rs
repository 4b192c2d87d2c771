//! Request and response bodies for user endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::users::{UserInviteView, UserWithAccess};
use crate::application::{ApplyOutcome, InviteAcceptance};
use crate::domain::foundation::{AuthenticatedUser, InviteCodeId, PlexUserId, Timestamp};
use crate::domain::users::PlexUserRecord;

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /plex/users/grant`.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantAccessRequest {
    pub user_id: i64,
}

/// Body of `PUT /plex/users/:id/notes`. `null` clears the notes.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNotesRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Views
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlexUserView {
    pub id: PlexUserId,
    pub uuid: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PlexUserRecord> for PlexUserView {
    fn from(record: PlexUserRecord) -> Self {
        Self {
            id: record.id,
            uuid: record.uuid,
            username: record.username,
            email: record.email,
            is_admin: record.is_admin,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserWithAccessView {
    #[serde(flatten)]
    pub user: PlexUserView,
    pub has_access: bool,
}

impl From<UserWithAccess> for UserWithAccessView {
    fn from(entry: UserWithAccess) -> Self {
        Self {
            user: PlexUserView::from(entry.user),
            has_access: entry.has_access,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInviteResponseView {
    pub id: i64,
    pub invite_code_id: InviteCodeId,
    pub code: String,
    pub entitlement_name: String,
    pub used_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    pub active: bool,
}

impl From<UserInviteView> for UserInviteResponseView {
    fn from(view: UserInviteView) -> Self {
        Self {
            id: view.detail.invite.id,
            invite_code_id: view.detail.invite.invite_code_id,
            code: view.detail.code,
            entitlement_name: view.detail.entitlement_name,
            used_at: view.detail.invite.used_at,
            expires_at: view.detail.invite.expires_at,
            active: view.active,
        }
    }
}

/// What a grant or revoke did at Plex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessOutcomeView {
    /// `granted`, `revoked`, `revoke_failed` or `admin_bypassed`.
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_id: Option<i64>,
    /// `accepted`, `skipped_no_token`, `skipped_unknown_user` or `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_acceptance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AccessOutcomeView {
    fn result(result: &str) -> Self {
        Self {
            result: result.to_string(),
            invite_id: None,
            invite_acceptance: None,
            reason: None,
        }
    }
}

impl From<ApplyOutcome> for AccessOutcomeView {
    fn from(outcome: ApplyOutcome) -> Self {
        match outcome {
            ApplyOutcome::Granted { share, acceptance } => {
                let (acceptance, reason) = match acceptance {
                    InviteAcceptance::Accepted => ("accepted", None),
                    InviteAcceptance::SkippedNoToken => ("skipped_no_token", None),
                    InviteAcceptance::SkippedUnknownUser => ("skipped_unknown_user", None),
                    InviteAcceptance::Failed(reason) => ("failed", Some(reason)),
                };
                Self {
                    invite_id: (share.invite_id > 0).then_some(share.invite_id),
                    invite_acceptance: Some(acceptance.to_string()),
                    reason,
                    ..Self::result("granted")
                }
            }
            ApplyOutcome::Revoked { .. } => Self::result("revoked"),
            ApplyOutcome::RevokeFailed { reason, .. } => Self {
                reason: Some(reason),
                ..Self::result("revoke_failed")
            },
            ApplyOutcome::AdminBypassed => Self::result("admin_bypassed"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `GET /user/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUserResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CurrentUserView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUserView {
    pub id: PlexUserId,
    pub uuid: String,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl From<Option<AuthenticatedUser>> for CurrentUserResponse {
    fn from(user: Option<AuthenticatedUser>) -> Self {
        Self {
            authenticated: user.is_some(),
            user: user.map(|u| CurrentUserView {
                id: u.id,
                uuid: u.uuid,
                username: u.username,
                email: u.email,
                is_admin: u.is_admin,
            }),
        }
    }
}

/// Body of `GET /plex/check-access`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckAccessResponse {
    pub status: String,
    pub has_access: bool,
}

impl CheckAccessResponse {
    pub fn new(has_access: bool) -> Self {
        Self {
            status: "success".to_string(),
            has_access,
        }
    }
}
