//! DeleteUserHandler - Revoke a user and forget them.

use std::sync::Arc;

use tracing::{error, info};

use crate::application::handlers::provisioning::{ApplyOutcome, ProvisioningOrchestrator};
use crate::domain::access::{AccessChangeRequest, AccessError, AccessSource, AccessSubject};
use crate::domain::foundation::PlexUserId;
use crate::ports::PlexUserRepository;

#[derive(Debug, Clone, Copy)]
pub struct DeleteUserCommand {
    pub user_id: PlexUserId,
    pub admin_id: PlexUserId,
}

/// Unshares, then deletes the record with its token and redemptions.
///
/// The record is kept if the unshare fails so the operator can retry.
pub struct DeleteUserHandler {
    users: Arc<dyn PlexUserRepository>,
    orchestrator: Arc<ProvisioningOrchestrator>,
}

impl DeleteUserHandler {
    pub fn new(users: Arc<dyn PlexUserRepository>, orchestrator: Arc<ProvisioningOrchestrator>) -> Self {
        Self {
            users,
            orchestrator,
        }
    }

    pub async fn handle(&self, cmd: DeleteUserCommand) -> Result<(), AccessError> {
        if self.orchestrator.is_admin(cmd.user_id) {
            return Err(AccessError::forbidden("the server owner cannot be deleted"));
        }
        if self.users.find_by_id(cmd.user_id).await?.is_none() {
            return Err(AccessError::not_found("plex_user", cmd.user_id));
        }

        let request = AccessChangeRequest::revoke(
            AccessSubject::UserId(cmd.user_id),
            AccessSource::Administrator {
                admin_id: cmd.admin_id,
            },
        );
        if let ApplyOutcome::RevokeFailed { reason, .. } = self.orchestrator.apply(&request).await? {
            error!(user_id = %cmd.user_id, reason = %reason, "Unshare failed, user not deleted");
            return Err(AccessError::provider(reason));
        }

        self.users.delete(cmd.user_id).await?;
        info!(user_id = %cmd.user_id, admin_id = %cmd.admin_id, "Deleted Plex user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccessDirectory;
    use crate::adapters::plex::MockMediaAccessClient;
    use crate::domain::foundation::{AuthenticatedUser, Timestamp};
    use crate::domain::users::{PlexToken, PlexUserRecord};
    use crate::ports::{MediaError, PlexTokenRepository};

    fn id(n: i64) -> PlexUserId {
        PlexUserId::new(n).unwrap()
    }

    async fn setup() -> (DeleteUserHandler, MockMediaAccessClient, InMemoryAccessDirectory) {
        let dir = InMemoryAccessDirectory::new();
        let identity = AuthenticatedUser::new(id(6), "u6", "fay", None, false);
        PlexUserRepository::upsert(&dir, &PlexUserRecord::from_identity(&identity, Timestamp::now()))
            .await
            .unwrap();
        PlexTokenRepository::upsert(&dir, &PlexToken::new(id(6), "tok", Timestamp::now()))
            .await
            .unwrap();
        let media = MockMediaAccessClient::new().with_shared_user(id(6));
        let orchestrator = Arc::new(ProvisioningOrchestrator::new(
            Arc::new(media.clone()),
            Arc::new(dir.clone()),
            Arc::new(dir.clone()),
            id(1),
        ));
        (
            DeleteUserHandler::new(Arc::new(dir.clone()), orchestrator),
            media,
            dir,
        )
    }

    fn delete(n: i64) -> DeleteUserCommand {
        DeleteUserCommand {
            user_id: id(n),
            admin_id: id(1),
        }
    }

    #[tokio::test]
    async fn unshares_then_deletes_with_token() {
        let (handler, media, dir) = setup().await;

        handler.handle(delete(6)).await.unwrap();

        assert!(!media.has_access(id(6)));
        assert_eq!(dir.user_count().await, 0);
        assert!(dir.find_by_user(id(6)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_unshare_keeps_record() {
        let (handler, media, dir) = setup().await;
        media.fail_unshare(MediaError::network("timed out"));

        let result = handler.handle(delete(6)).await;

        assert!(matches!(result, Err(AccessError::Provider(_))));
        assert_eq!(dir.user_count().await, 1);
    }

    #[tokio::test]
    async fn admin_and_unknown_users_are_rejected() {
        let (handler, media, _dir) = setup().await;

        assert!(matches!(
            handler.handle(delete(1)).await,
            Err(AccessError::Forbidden(_))
        ));
        assert!(matches!(
            handler.handle(delete(99)).await,
            Err(AccessError::NotFound { .. })
        ));
        assert!(media.unshared_users().is_empty());
    }
}
