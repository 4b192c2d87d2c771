//! RedeemInviteCodeHandler - Command handler for consuming one use of a code.
//!
//! Records the redemption and emits a grant for the caller's email. It does
//! not call Plex; `ClaimInviteCodeHandler` applies the grant.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::access::{AccessChangeRequest, AccessError, AccessSource, AccessSubject};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::domain::invites::{InviteCode, InviteRedemption};
use crate::domain::users::PlexUserRecord;
use crate::ports::{InviteCodeRepository, PlexUserRepository};

/// Command to redeem a code on behalf of the caller.
#[derive(Debug, Clone)]
pub struct RedeemInviteCodeCommand {
    pub code: String,
    pub user: AuthenticatedUser,
}

/// Result of a successful redemption.
#[derive(Debug, Clone)]
pub struct RedeemInviteCodeResult {
    /// The code after its use counter was incremented.
    pub invite_code: InviteCode,
    /// Grant to hand to the orchestrator.
    pub request: AccessChangeRequest,
}

/// Handler for redeeming invite codes.
///
/// Unknown, disabled, expired and exhausted codes all fail with the same
/// `InvalidOrExpired` error so callers cannot probe which codes exist.
pub struct RedeemInviteCodeHandler {
    codes: Arc<dyn InviteCodeRepository>,
    users: Arc<dyn PlexUserRepository>,
}

impl RedeemInviteCodeHandler {
    pub fn new(codes: Arc<dyn InviteCodeRepository>, users: Arc<dyn PlexUserRepository>) -> Self {
        Self { codes, users }
    }

    pub async fn handle(
        &self,
        cmd: RedeemInviteCodeCommand,
    ) -> Result<RedeemInviteCodeResult, AccessError> {
        let code = cmd.code.trim();
        if code.is_empty() {
            return Err(AccessError::validation("code", "code is required"));
        }
        let email = cmd
            .user
            .email()
            .ok_or_else(|| AccessError::validation("email", "your Plex account has no email"))?
            .to_string();

        let now = Timestamp::now();

        // 1. Check the code before touching the directory
        let invite_code = match self.codes.find_by_code(code).await? {
            Some(invite_code) => invite_code,
            None => {
                debug!(user_id = %cmd.user.id, "Redemption of unknown code");
                return Err(AccessError::InvalidOrExpired);
            }
        };
        if let Err(block) = invite_code.redemption_check(&now) {
            info!(
                user_id = %cmd.user.id,
                code_id = %invite_code.id,
                reason = %block,
                "Invite code not redeemable"
            );
            return Err(AccessError::InvalidOrExpired);
        }

        // 2. The redemption row references the user
        self.users
            .insert_if_missing(&PlexUserRecord::from_identity(&cmd.user, now))
            .await?;

        // 3. Guarded increment plus redemption upsert, atomically
        let redemption = InviteRedemption {
            user_id: cmd.user.id,
            invite_code_id: invite_code.id,
            used_at: now,
            expires_at: invite_code.duration,
        };
        if !self.codes.redeem(&redemption).await? {
            info!(
                user_id = %cmd.user.id,
                code_id = %invite_code.id,
                "Invite code was used up concurrently"
            );
            return Err(AccessError::InvalidOrExpired);
        }

        let updated = self
            .codes
            .find_by_id(invite_code.id)
            .await?
            .unwrap_or_else(|| InviteCode {
                used_count: invite_code.used_count + 1,
                ..invite_code.clone()
            });

        info!(
            user_id = %cmd.user.id,
            code_id = %updated.id,
            used_count = updated.used_count,
            "Redeemed invite code"
        );

        let request = AccessChangeRequest::grant(
            AccessSubject::Email(email),
            AccessSource::InviteRedemption {
                code_id: updated.id,
            },
        );

        Ok(RedeemInviteCodeResult {
            invite_code: updated,
            request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccessDirectory;
    use crate::domain::access::AccessAction;
    use crate::domain::foundation::PlexUserId;
    use crate::domain::invites::NewInviteCode;

    fn user(n: i64) -> AuthenticatedUser {
        AuthenticatedUser::new(
            PlexUserId::new(n).unwrap(),
            format!("uuid-{}", n),
            format!("user{}", n),
            Some(format!("user{}@example.com", n)),
            false,
        )
    }

    async fn seed(
        dir: &InMemoryAccessDirectory,
        code: &str,
        max_uses: Option<i64>,
        expires_at: Option<Timestamp>,
    ) -> InviteCode {
        let new_code =
            NewInviteCode::new(code.into(), "plex".into(), max_uses, expires_at, None).unwrap();
        InviteCodeRepository::save(dir, &new_code).await.unwrap()
    }

    fn handler(dir: &InMemoryAccessDirectory) -> RedeemInviteCodeHandler {
        RedeemInviteCodeHandler::new(Arc::new(dir.clone()), Arc::new(dir.clone()))
    }

    fn cmd(code: &str, n: i64) -> RedeemInviteCodeCommand {
        RedeemInviteCodeCommand {
            code: code.to_string(),
            user: user(n),
        }
    }

    #[tokio::test]
    async fn redeem_emits_grant_for_callers_email() {
        let dir = InMemoryAccessDirectory::new();
        seed(&dir, "WELCOME", Some(2), None).await;

        let result = handler(&dir).handle(cmd("WELCOME", 5)).await.unwrap();

        assert_eq!(result.invite_code.used_count, 1);
        assert_eq!(result.request.action, AccessAction::Grant);
        assert_eq!(
            result.request.subject,
            AccessSubject::Email("user5@example.com".into())
        );
        assert_eq!(dir.user_count().await, 1);
    }

    #[tokio::test]
    async fn single_use_code_is_exhausted_for_second_user() {
        let dir = InMemoryAccessDirectory::new();
        seed(&dir, "ONCE", Some(1), None).await;
        let handler = handler(&dir);

        handler.handle(cmd("ONCE", 5)).await.unwrap();
        let second = handler.handle(cmd("ONCE", 6)).await;

        assert!(matches!(second, Err(AccessError::InvalidOrExpired)));
    }

    #[tokio::test]
    async fn unknown_and_expired_codes_fail_identically() {
        let dir = InMemoryAccessDirectory::new();
        seed(&dir, "OLD", None, Some(Timestamp::now().minus_days(1))).await;
        let handler = handler(&dir);

        let unknown = handler.handle(cmd("NOPE", 5)).await.unwrap_err();
        let expired = handler.handle(cmd("OLD", 5)).await.unwrap_err();

        assert_eq!(unknown, AccessError::InvalidOrExpired);
        assert_eq!(expired, AccessError::InvalidOrExpired);
        assert_eq!(unknown.message(), expired.message());
        assert_eq!(dir.user_count().await, 0);
    }

    #[tokio::test]
    async fn disabled_code_cannot_be_redeemed() {
        let dir = InMemoryAccessDirectory::new();
        let code = seed(&dir, "OFF", None, None).await;
        InviteCodeRepository::disable(&dir, code.id).await.unwrap();

        let result = handler(&dir).handle(cmd("OFF", 5)).await;

        assert!(matches!(result, Err(AccessError::InvalidOrExpired)));
    }

    #[tokio::test]
    async fn caller_without_email_is_rejected() {
        let dir = InMemoryAccessDirectory::new();
        seed(&dir, "WELCOME", None, None).await;
        let mut no_email = cmd("WELCOME", 5);
        no_email.user.email = None;

        let result = handler(&dir).handle(no_email).await;

        assert!(matches!(result, Err(AccessError::Validation { .. })));
    }

    #[tokio::test]
    async fn blank_code_is_validation_error() {
        let dir = InMemoryAccessDirectory::new();

        let result = handler(&dir).handle(cmd("   ", 5)).await;

        assert!(matches!(result, Err(AccessError::Validation { .. })));
    }

    #[tokio::test]
    async fn duration_becomes_grant_expiry() {
        let dir = InMemoryAccessDirectory::new();
        let cutoff = Timestamp::now().plus_days(30);
        let new_code =
            NewInviteCode::new("TRIAL".into(), "plex".into(), None, None, Some(cutoff)).unwrap();
        InviteCodeRepository::save(&dir, &new_code).await.unwrap();

        handler(&dir).handle(cmd("TRIAL", 5)).await.unwrap();

        let invites = PlexUserRepository::list_invites(&dir, PlexUserId::new(5).unwrap())
            .await
            .unwrap();
        assert_eq!(invites.len(), 1);
        assert_eq!(invites[0].invite.expires_at, Some(cutoff));
    }
}
