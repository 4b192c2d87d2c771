//! DisableInviteCodeHandler - Command handler for retiring a code.

use std::sync::Arc;

use tracing::info;

use crate::domain::access::AccessError;
use crate::domain::foundation::InviteCodeId;
use crate::ports::InviteCodeRepository;

/// Command to disable a code.
#[derive(Debug, Clone, Copy)]
pub struct DisableInviteCodeCommand {
    pub id: InviteCodeId,
}

/// Handler for disabling invite codes.
///
/// Disabling is terminal and idempotent. Codes are never deleted.
pub struct DisableInviteCodeHandler {
    repository: Arc<dyn InviteCodeRepository>,
}

impl DisableInviteCodeHandler {
    pub fn new(repository: Arc<dyn InviteCodeRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DisableInviteCodeCommand) -> Result<(), AccessError> {
        if !self.repository.disable(cmd.id).await? {
            return Err(AccessError::not_found("invite_code", cmd.id));
        }
        info!(code_id = %cmd.id, "Disabled invite code");
        Ok(())
    }
}
