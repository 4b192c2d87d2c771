//! RevokeAccessHandler - Administrator revoke for a user.

use std::sync::Arc;

use tracing::error;

use crate::application::handlers::provisioning::{ApplyOutcome, ProvisioningOrchestrator};
use crate::domain::access::{AccessChangeRequest, AccessError, AccessSource, AccessSubject};
use crate::domain::foundation::PlexUserId;

#[derive(Debug, Clone, Copy)]
pub struct RevokeAccessCommand {
    pub user_id: PlexUserId,
    pub admin_id: PlexUserId,
}

/// Unshares the libraries from a user.
///
/// Unlike the billing path there is no redelivery here, so a failed
/// unshare is returned as a provider error.
pub struct RevokeAccessHandler {
    orchestrator: Arc<ProvisioningOrchestrator>,
}

impl RevokeAccessHandler {
    pub fn new(orchestrator: Arc<ProvisioningOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn handle(&self, cmd: RevokeAccessCommand) -> Result<(), AccessError> {
        let request = AccessChangeRequest::revoke(
            AccessSubject::UserId(cmd.user_id),
            AccessSource::Administrator {
                admin_id: cmd.admin_id,
            },
        );
        match self.orchestrator.apply(&request).await? {
            ApplyOutcome::RevokeFailed { user_id, reason } => {
                error!(user_id = %user_id, reason = %reason, "Administrator revoke failed");
                Err(AccessError::provider(reason))
            }
            _ => Ok(()),
        }
    }
}
