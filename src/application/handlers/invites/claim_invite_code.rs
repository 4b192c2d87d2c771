//! ClaimInviteCodeHandler - Redeem a code and share the libraries.

use std::sync::Arc;

use tracing::error;

use crate::application::handlers::provisioning::{ApplyOutcome, ProvisioningOrchestrator};
use crate::domain::access::AccessError;
use crate::domain::invites::InviteCode;

use super::redeem_invite_code::{RedeemInviteCodeCommand, RedeemInviteCodeHandler};

/// Command to claim a code; same shape as a redemption.
pub type ClaimInviteCodeCommand = RedeemInviteCodeCommand;

/// Result of a claim.
#[derive(Debug, Clone)]
pub struct ClaimInviteCodeResult {
    pub invite_code: InviteCode,
    pub outcome: ApplyOutcome,
}

/// Handler for `POST /codes/claim`.
///
/// The redemption is committed before Plex is called. If the share then
/// fails the use stays counted and the error is returned; the operator
/// fixes access by hand.
pub struct ClaimInviteCodeHandler {
    redeem: RedeemInviteCodeHandler,
    orchestrator: Arc<ProvisioningOrchestrator>,
}

impl ClaimInviteCodeHandler {
    pub fn new(redeem: RedeemInviteCodeHandler, orchestrator: Arc<ProvisioningOrchestrator>) -> Self {
        Self {
            redeem,
            orchestrator,
        }
    }

    pub async fn handle(
        &self,
        cmd: ClaimInviteCodeCommand,
    ) -> Result<ClaimInviteCodeResult, AccessError> {
        let user_id = cmd.user.id;
        let redeemed = self.redeem.handle(cmd).await?;

        let outcome = self
            .orchestrator
            .apply(&redeemed.request)
            .await
            .map_err(|e| {
                error!(
                    user_id = %user_id,
                    code_id = %redeemed.invite_code.id,
                    correlation_id = %redeemed.request.correlation_id,
                    error = %e,
                    "Invite redeemed but share failed"
                );
                e
            })?;

        Ok(ClaimInviteCodeResult {
            invite_code: redeemed.invite_code,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccessDirectory;
    use crate::adapters::plex::MockMediaAccessClient;
    use crate::domain::foundation::{AuthenticatedUser, PlexUserId};
    use crate::domain::invites::NewInviteCode;
    use crate::ports::{InviteCodeRepository, MediaError};

    fn id(n: i64) -> PlexUserId {
        PlexUserId::new(n).unwrap()
    }

    fn claim(code: &str, n: i64) -> ClaimInviteCodeCommand {
        ClaimInviteCodeCommand {
            code: code.to_string(),
            user: AuthenticatedUser::new(
                id(n),
                format!("uuid-{}", n),
                format!("user{}", n),
                Some(format!("user{}@example.com", n)),
                false,
            ),
        }
    }

    async fn setup(max_uses: Option<i64>) -> (ClaimInviteCodeHandler, MockMediaAccessClient, InMemoryAccessDirectory) {
        let dir = InMemoryAccessDirectory::new();
        let new_code = NewInviteCode::new("JOIN".into(), "plex".into(), max_uses, None, None).unwrap();
        InviteCodeRepository::save(&dir, &new_code).await.unwrap();

        let media = MockMediaAccessClient::new().with_account("user5@example.com", id(5));
        let orchestrator = Arc::new(ProvisioningOrchestrator::new(
            Arc::new(media.clone()),
            Arc::new(dir.clone()),
            Arc::new(dir.clone()),
            id(1),
        ));
        let redeem = RedeemInviteCodeHandler::new(Arc::new(dir.clone()), Arc::new(dir.clone()));
        (ClaimInviteCodeHandler::new(redeem, orchestrator), media, dir)
    }

    #[tokio::test]
    async fn claim_shares_with_caller() {
        let (handler, media, _dir) = setup(Some(1)).await;

        let result = handler.handle(claim("JOIN", 5)).await.unwrap();

        assert_eq!(result.invite_code.used_count, 1);
        assert!(matches!(result.outcome, ApplyOutcome::Granted { .. }));
        assert!(media.has_access(id(5)));
    }

    #[tokio::test]
    async fn exhausted_code_makes_no_plex_call() {
        let (handler, media, _dir) = setup(Some(1)).await;
        handler.handle(claim("JOIN", 5)).await.unwrap();

        let second = handler.handle(claim("JOIN", 6)).await;

        assert!(matches!(second, Err(AccessError::InvalidOrExpired)));
        assert_eq!(media.shared_emails(), vec!["user5@example.com"]);
    }

    #[tokio::test]
    async fn share_failure_surfaces_but_use_is_kept() {
        let (handler, media, dir) = setup(None).await;
        media.fail_share(MediaError::unexpected_status(503, "unavailable"));

        let result = handler.handle(claim("JOIN", 5)).await;

        assert!(matches!(result, Err(AccessError::Provider(_))));
        let code = InviteCodeRepository::find_by_code(&dir, "JOIN")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(code.used_count, 1);
    }
}
