//! GrantAccessHandler - Administrator grant for a known user.

use std::sync::Arc;

use crate::application::handlers::provisioning::{ApplyOutcome, ProvisioningOrchestrator};
use crate::domain::access::{AccessChangeRequest, AccessError, AccessSource, AccessSubject};
use crate::domain::foundation::PlexUserId;

#[derive(Debug, Clone, Copy)]
pub struct GrantAccessCommand {
    pub user_id: PlexUserId,
    /// The administrator performing the grant.
    pub admin_id: PlexUserId,
}

/// Shares the libraries with a stored user's email.
///
/// 404 when the user is unknown, 400 when the record has no email.
pub struct GrantAccessHandler {
    orchestrator: Arc<ProvisioningOrchestrator>,
}

impl GrantAccessHandler {
    pub fn new(orchestrator: Arc<ProvisioningOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn handle(&self, cmd: GrantAccessCommand) -> Result<ApplyOutcome, AccessError> {
        let request = AccessChangeRequest::grant(
            AccessSubject::UserId(cmd.user_id),
            AccessSource::Administrator {
                admin_id: cmd.admin_id,
            },
        );
        self.orchestrator.apply(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccessDirectory;
    use crate::adapters::plex::MockMediaAccessClient;
    use crate::domain::foundation::{AuthenticatedUser, Timestamp};
    use crate::domain::users::PlexUserRecord;
    use crate::ports::PlexUserRepository;

    fn id(n: i64) -> PlexUserId {
        PlexUserId::new(n).unwrap()
    }

    #[tokio::test]
    async fn grants_by_stored_email() {
        let dir = InMemoryAccessDirectory::new();
        let identity =
            AuthenticatedUser::new(id(4), "u4", "dan", Some("dan@example.com".into()), false);
        PlexUserRepository::upsert(&dir, &PlexUserRecord::from_identity(&identity, Timestamp::now()))
            .await
            .unwrap();
        let media = MockMediaAccessClient::new().with_account("dan@example.com", id(4));
        let orchestrator = Arc::new(ProvisioningOrchestrator::new(
            Arc::new(media.clone()),
            Arc::new(dir.clone()),
            Arc::new(dir),
            id(1),
        ));

        let outcome = GrantAccessHandler::new(orchestrator)
            .handle(GrantAccessCommand {
                user_id: id(4),
                admin_id: id(1),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, ApplyOutcome::Granted { .. }));
        assert!(media.has_access(id(4)));
    }
}
