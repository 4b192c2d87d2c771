//! Webhook response bodies.

use serde::{Deserialize, Serialize};

use crate::application::handlers::billing::HandleEntitlementWebhookResult;

/// Acknowledgement sent to Stripe for every 2xx delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookAckResponse {
    pub status: String,
    pub event_id: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<HandleEntitlementWebhookResult> for WebhookAckResponse {
    fn from(result: HandleEntitlementWebhookResult) -> Self {
        let (event_id, outcome, reason) = match result {
            HandleEntitlementWebhookResult::AccessGranted { event_id, .. } => {
                (event_id, "access_granted", None)
            }
            HandleEntitlementWebhookResult::AccessRevoked { event_id, .. } => {
                (event_id, "access_revoked", None)
            }
            HandleEntitlementWebhookResult::RevokeFailed {
                event_id, reason, ..
            } => (event_id, "revoke_failed", Some(reason)),
            HandleEntitlementWebhookResult::AdminBypassed { event_id } => {
                (event_id, "admin_bypassed", None)
            }
            HandleEntitlementWebhookResult::NoChange { event_id, reason } => {
                (event_id, "no_change", Some(reason))
            }
        };

        Self {
            status: "success".to_string(),
            event_id,
            outcome: outcome.to_string(),
            reason,
        }
    }
}
