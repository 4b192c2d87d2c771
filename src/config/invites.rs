//! Invite code configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Invite code defaults
#[derive(Debug, Clone, Deserialize)]
pub struct InviteConfig {
    /// Entitlement recorded on codes created without one
    #[serde(default = "default_entitlement")]
    pub default_entitlement: String,

    /// Length of generated codes
    #[serde(default = "default_code_length")]
    pub code_length: usize,
}

impl InviteConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_entitlement.trim().is_empty() {
            return Err(ValidationError::MissingRequired("INVITES__DEFAULT_ENTITLEMENT"));
        }
        if !(6..=32).contains(&self.code_length) {
            return Err(ValidationError::InvalidCodeLength);
        }
        Ok(())
    }
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            default_entitlement: default_entitlement(),
            code_length: default_code_length(),
        }
    }
}

fn default_entitlement() -> String {
    "plex".to_string()
}

fn default_code_length() -> usize {
    8
}
