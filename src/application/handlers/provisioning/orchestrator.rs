//! ProvisioningOrchestrator - applies access change requests to Plex.
//!
//! The only component that sequences cross-system effects. A grant is two
//! phases with independent failure handling: the share itself, then a
//! best-effort acceptance of the pending invite using the invitee's stored
//! token. A failed acceptance never undoes the share.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::access::{AccessAction, AccessChangeRequest, AccessError, AccessSubject};
use crate::domain::foundation::PlexUserId;
use crate::ports::{MediaAccessClient, PlexTokenRepository, PlexUserRepository, ShareResult};

/// What happened to the pending share invitation after a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteAcceptance {
    /// Accepted with the invitee's token.
    Accepted,
    /// The invitee has never logged in; they accept manually.
    SkippedNoToken,
    /// Plex did not report which account was invited.
    SkippedUnknownUser,
    /// Acceptance was attempted and failed. The share stands.
    Failed(String),
}

/// Result of applying one access change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Granted {
        share: ShareResult,
        acceptance: InviteAcceptance,
    },
    Revoked {
        user_id: PlexUserId,
    },
    /// The unshare call failed. Callers decide whether that is fatal.
    RevokeFailed {
        user_id: PlexUserId,
        reason: String,
    },
    /// The server owner always has access; no Plex call was made.
    AdminBypassed,
}

/// Applies grant and revoke requests from any entitlement source.
///
/// Grants are not pre-checked against current access: re-sharing is
/// idempotent at Plex, and checking first would race with the act.
pub struct ProvisioningOrchestrator {
    media: Arc<dyn MediaAccessClient>,
    users: Arc<dyn PlexUserRepository>,
    tokens: Arc<dyn PlexTokenRepository>,
    admin_user_id: PlexUserId,
}

impl ProvisioningOrchestrator {
    pub fn new(
        media: Arc<dyn MediaAccessClient>,
        users: Arc<dyn PlexUserRepository>,
        tokens: Arc<dyn PlexTokenRepository>,
        admin_user_id: PlexUserId,
    ) -> Self {
        Self {
            media,
            users,
            tokens,
            admin_user_id,
        }
    }

    pub fn admin_user_id(&self) -> PlexUserId {
        self.admin_user_id
    }

    pub fn is_admin(&self, user_id: PlexUserId) -> bool {
        user_id == self.admin_user_id
    }

    /// Apply one access change.
    ///
    /// # Errors
    ///
    /// - `Validation` if a grant has no usable email
    /// - `NotFound` if the subject cannot be located in the directory
    /// - `Forbidden` when asked to revoke the server owner
    /// - `Provider` if the share call fails
    /// - `Storage` on directory failures
    pub async fn apply(&self, request: &AccessChangeRequest) -> Result<ApplyOutcome, AccessError> {
        debug!(
            correlation_id = %request.correlation_id,
            action = %request.action,
            subject = %request.subject,
            source = request.source.kind(),
            "Applying access change"
        );

        match request.action {
            AccessAction::Grant => self.grant(request).await,
            AccessAction::Revoke => self.revoke(request).await,
        }
    }

    async fn grant(&self, request: &AccessChangeRequest) -> Result<ApplyOutcome, AccessError> {
        let (email, known_user) = match &request.subject {
            AccessSubject::Email(email) => {
                let email = email.trim();
                if email.is_empty() {
                    return Err(AccessError::validation("email", "grant target has no email"));
                }
                let known = self.users.find_by_email(email).await?.map(|u| u.id);
                if known.is_some_and(|id| self.is_admin(id)) {
                    return Ok(self.bypass(request));
                }
                (email.to_string(), known)
            }
            AccessSubject::UserId(user_id) => {
                if self.is_admin(*user_id) {
                    return Ok(self.bypass(request));
                }
                let user = self
                    .users
                    .find_by_id(*user_id)
                    .await?
                    .ok_or_else(|| AccessError::not_found("plex_user", user_id))?;
                let email = user.email().ok_or_else(|| {
                    AccessError::validation("email", format!("plex user {} has no email", user_id))
                })?;
                (email.to_string(), Some(*user_id))
            }
        };

        let share = match self.media.share_library(&email).await {
            Ok(share) => share,
            Err(e) if e.is_already_shared() => {
                info!(
                    correlation_id = %request.correlation_id,
                    source = request.source.kind(),
                    "Libraries already shared, nothing to do"
                );
                return Ok(ApplyOutcome::Granted {
                    share: ShareResult {
                        invite_id: 0,
                        invited_user_id: None,
                    },
                    acceptance: InviteAcceptance::SkippedUnknownUser,
                });
            }
            Err(e) => {
                error!(
                    correlation_id = %request.correlation_id,
                    status = ?e.status,
                    error = %e,
                    "Plex share failed"
                );
                return Err(AccessError::from(e));
            }
        };

        info!(
            correlation_id = %request.correlation_id,
            invite_id = share.invite_id,
            source = request.source.kind(),
            "Shared libraries"
        );

        // Owner email not yet stored locally; Plex resolved it to the admin.
        if share.invited_user_id.is_some_and(|id| self.is_admin(id)) {
            return Ok(self.bypass(request));
        }

        let target = share.invited_user_id.or(known_user);
        let acceptance = self
            .accept_pending_invite(request, target, share.invite_id)
            .await;

        Ok(ApplyOutcome::Granted { share, acceptance })
    }

    /// Second phase of a grant. Never fails the grant.
    async fn accept_pending_invite(
        &self,
        request: &AccessChangeRequest,
        user_id: Option<PlexUserId>,
        invite_id: i64,
    ) -> InviteAcceptance {
        let Some(user_id) = user_id else {
            debug!(correlation_id = %request.correlation_id, "No invited account reported, skipping acceptance");
            return InviteAcceptance::SkippedUnknownUser;
        };

        if invite_id <= 0 {
            warn!(
                correlation_id = %request.correlation_id,
                user_id = %user_id,
                "Share response carried no invite id, skipping acceptance"
            );
            return InviteAcceptance::Failed("share response carried no invite id".to_string());
        }

        let token = match self.tokens.find_by_user(user_id).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!(
                    correlation_id = %request.correlation_id,
                    user_id = %user_id,
                    "User has no stored token, invite stays pending"
                );
                return InviteAcceptance::SkippedNoToken;
            }
            Err(e) => {
                warn!(
                    correlation_id = %request.correlation_id,
                    user_id = %user_id,
                    error = %e,
                    "Token lookup failed, invite stays pending"
                );
                return InviteAcceptance::Failed(e.to_string());
            }
        };

        match self.media.accept_invite(&token.access_token, invite_id).await {
            Ok(()) => {
                info!(
                    correlation_id = %request.correlation_id,
                    user_id = %user_id,
                    invite_id,
                    "Accepted share invite"
                );
                InviteAcceptance::Accepted
            }
            Err(e) => {
                warn!(
                    correlation_id = %request.correlation_id,
                    user_id = %user_id,
                    invite_id,
                    status = ?e.status,
                    error = %e,
                    "Auto-accept failed, user can accept manually"
                );
                InviteAcceptance::Failed(e.to_string())
            }
        }
    }

    async fn revoke(&self, request: &AccessChangeRequest) -> Result<ApplyOutcome, AccessError> {
        let user_id = match &request.subject {
            AccessSubject::UserId(user_id) => *user_id,
            AccessSubject::Email(email) => self
                .users
                .find_by_email(email)
                .await?
                .map(|u| u.id)
                .ok_or_else(|| AccessError::not_found("plex_user", email))?,
        };

        if self.is_admin(user_id) {
            warn!(
                correlation_id = %request.correlation_id,
                user_id = %user_id,
                source = request.source.kind(),
                "Refusing to revoke the server owner"
            );
            return Err(AccessError::forbidden(
                "the server owner's access cannot be revoked",
            ));
        }

        match self.media.unshare_library(user_id).await {
            Ok(()) => {
                info!(
                    correlation_id = %request.correlation_id,
                    user_id = %user_id,
                    source = request.source.kind(),
                    "Revoked library share"
                );
                Ok(ApplyOutcome::Revoked { user_id })
            }
            Err(e) => {
                warn!(
                    correlation_id = %request.correlation_id,
                    user_id = %user_id,
                    status = ?e.status,
                    error = %e,
                    "Plex unshare failed"
                );
                Ok(ApplyOutcome::RevokeFailed {
                    user_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn bypass(&self, request: &AccessChangeRequest) -> ApplyOutcome {
        info!(
            correlation_id = %request.correlation_id,
            "Grant targets the server owner, nothing to share"
        );
        ApplyOutcome::AdminBypassed
    }
}
