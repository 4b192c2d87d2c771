//! CreateInviteCodeHandler - Command handler for issuing invite codes.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::access::AccessError;
use crate::domain::foundation::Timestamp;
use crate::domain::invites::{generate_code, validate_code, InviteCode, NewInviteCode};
use crate::ports::InviteCodeRepository;

/// Attempts at finding an unused generated code before giving up.
const GENERATION_ATTEMPTS: usize = 3;

/// Command to create an invite code.
#[derive(Debug, Clone, Default)]
pub struct CreateInviteCodeCommand {
    /// Administrator-chosen code; generated when absent or blank.
    pub code: Option<String>,
    pub max_uses: Option<i64>,
    pub expires_at: Option<Timestamp>,
    /// Falls back to the configured default entitlement when absent or blank.
    pub entitlement_name: Option<String>,
    pub duration: Option<Timestamp>,
}

/// Handler for creating invite codes.
pub struct CreateInviteCodeHandler {
    repository: Arc<dyn InviteCodeRepository>,
    default_entitlement: String,
    code_length: usize,
}

impl CreateInviteCodeHandler {
    pub fn new(
        repository: Arc<dyn InviteCodeRepository>,
        default_entitlement: impl Into<String>,
        code_length: usize,
    ) -> Self {
        Self {
            repository,
            default_entitlement: default_entitlement.into(),
            code_length,
        }
    }

    pub async fn handle(&self, cmd: CreateInviteCodeCommand) -> Result<InviteCode, AccessError> {
        let entitlement_name = cmd
            .entitlement_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.default_entitlement.as_str())
            .to_string();

        let requested = cmd
            .code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());

        let saved = match requested {
            Some(code) => {
                let code = validate_code(code)?;
                let new_code = NewInviteCode::new(
                    code,
                    entitlement_name,
                    cmd.max_uses,
                    cmd.expires_at,
                    cmd.duration,
                )?;
                self.repository.save(&new_code).await?
            }
            None => {
                self.save_generated(entitlement_name, cmd.max_uses, cmd.expires_at, cmd.duration)
                    .await?
            }
        };

        info!(
            code_id = %saved.id,
            entitlement = %saved.entitlement_name,
            max_uses = ?saved.max_uses,
            "Created invite code"
        );

        Ok(saved)
    }

    async fn save_generated(
        &self,
        entitlement_name: String,
        max_uses: Option<i64>,
        expires_at: Option<Timestamp>,
        duration: Option<Timestamp>,
    ) -> Result<InviteCode, AccessError> {
        let mut last_error = None;
        for _ in 0..GENERATION_ATTEMPTS {
            let new_code = NewInviteCode::new(
                generate_code(self.code_length),
                entitlement_name.clone(),
                max_uses,
                expires_at,
                duration,
            )?;
            match self.repository.save(&new_code).await.map_err(AccessError::from) {
                Ok(saved) => return Ok(saved),
                // The only validation failure on save is a taken code
                Err(err @ AccessError::Validation { .. }) => {
                    warn!("Generated invite code collided, retrying");
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_error
            .unwrap_or_else(|| AccessError::storage("could not generate a unique invite code")))
    }
}
