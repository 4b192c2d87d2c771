//! HandleEntitlementWebhookHandler - processes Stripe entitlement summary webhooks.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::handlers::provisioning::{ApplyOutcome, ProvisioningOrchestrator};
use crate::domain::access::AccessError;
use crate::domain::billing::{
    EntitlementDecision, EntitlementInterpreter, StripeWebhookVerifier, WebhookError,
};
use crate::domain::foundation::{CorrelationId, PlexUserId};
use crate::ports::BillingProvider;

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleEntitlementWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header, if sent.
    pub signature: Option<String>,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleEntitlementWebhookResult {
    /// Libraries shared with the customer's Plex email.
    AccessGranted {
        event_id: String,
        correlation_id: CorrelationId,
    },
    /// Share removed from the customer's Plex account.
    AccessRevoked {
        event_id: String,
        user_id: PlexUserId,
    },
    /// Unshare failed. Logged and acknowledged; entitlement loss lives in Stripe.
    RevokeFailed {
        event_id: String,
        user_id: PlexUserId,
        reason: String,
    },
    /// The customer maps to the server owner.
    AdminBypassed { event_id: String },
    /// The summary changed but not in a way that affects access.
    NoChange { event_id: String, reason: String },
}

/// Handler for `entitlements.active_entitlement_summary.updated` webhooks.
///
/// Verifies the signature, interprets the summary, resolves the Stripe
/// customer to a Plex identity and applies the resulting access change.
/// Every error maps to a status via `WebhookError::status_code`; non-2xx
/// responses make Stripe redeliver, which is the only retry path.
pub struct HandleEntitlementWebhookHandler {
    verifier: StripeWebhookVerifier,
    interpreter: EntitlementInterpreter,
    billing: Arc<dyn BillingProvider>,
    orchestrator: Arc<ProvisioningOrchestrator>,
    require_livemode: bool,
}

impl HandleEntitlementWebhookHandler {
    pub fn new(
        verifier: StripeWebhookVerifier,
        interpreter: EntitlementInterpreter,
        billing: Arc<dyn BillingProvider>,
        orchestrator: Arc<ProvisioningOrchestrator>,
    ) -> Self {
        Self {
            verifier,
            interpreter,
            billing,
            orchestrator,
            require_livemode: false,
        }
    }

    /// Acknowledge test-mode events without acting on them.
    pub fn with_livemode_required(mut self, required: bool) -> Self {
        self.require_livemode = required;
        self
    }

    pub async fn handle(
        &self,
        cmd: HandleEntitlementWebhookCommand,
    ) -> Result<HandleEntitlementWebhookResult, WebhookError> {
        // 1. Verify signature and parse event
        let signature = cmd.signature.ok_or(WebhookError::MissingSignature)?;
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &signature)
            .map_err(|e| {
                warn!(error = %e, "Rejected webhook delivery");
                e
            })?;

        if self.require_livemode && !event.is_live() {
            return Err(WebhookError::Ignored(format!(
                "test mode event {} in live-only deployment",
                event.id
            )));
        }

        // 2. Interpret
        let decision = self.interpreter.interpret(&event)?;
        let event_id = event.id.clone();
        let customer_id = decision.customer_id().to_string();

        if let EntitlementDecision::NoOp { reason, .. } = &decision {
            info!(event_id = %event_id, customer_id = %customer_id, reason = %reason, "Entitlement change needs no action");
            return Ok(HandleEntitlementWebhookResult::NoChange {
                event_id,
                reason: reason.clone(),
            });
        }

        // 3. Resolve the Plex identity from the Stripe customer
        let customer = self
            .billing
            .get_customer(&customer_id)
            .await
            .map_err(|e| {
                error!(event_id = %event_id, customer_id = %customer_id, error = %e, "Stripe customer lookup failed");
                WebhookError::from(AccessError::from(e))
            })?
            .ok_or_else(|| {
                AccessError::identity_resolution(&customer_id, "customer does not exist in Stripe")
            })
            .map_err(|e| self.identity_failure(&event_id, e))?;

        let Some(request) = self
            .interpreter
            .resolve(&decision, &event_id, &customer)
            .map_err(|e| self.identity_failure(&event_id, e))?
        else {
            return Ok(HandleEntitlementWebhookResult::NoChange {
                event_id,
                reason: "nothing to apply".to_string(),
            });
        };
        let request = request.with_correlation_id(correlation_for_event(&event_id));
        let correlation_id = request.correlation_id;

        info!(
            event_id = %event_id,
            customer_id = %customer_id,
            correlation_id = %correlation_id,
            action = %request.action,
            "Applying entitlement change"
        );

        // 4. Apply
        let outcome = self.orchestrator.apply(&request).await.map_err(|e| {
            error!(
                event_id = %event_id,
                customer_id = %customer_id,
                correlation_id = %correlation_id,
                error = %e,
                "Entitlement change failed"
            );
            WebhookError::from(e)
        })?;

        Ok(match outcome {
            ApplyOutcome::Granted { .. } => HandleEntitlementWebhookResult::AccessGranted {
                event_id,
                correlation_id,
            },
            ApplyOutcome::Revoked { user_id } => {
                HandleEntitlementWebhookResult::AccessRevoked { event_id, user_id }
            }
            ApplyOutcome::RevokeFailed { user_id, reason } => {
                warn!(
                    event_id = %event_id,
                    customer_id = %customer_id,
                    correlation_id = %correlation_id,
                    user_id = %user_id,
                    reason = %reason,
                    "Revoke did not reach Plex, acknowledging anyway"
                );
                HandleEntitlementWebhookResult::RevokeFailed {
                    event_id,
                    user_id,
                    reason,
                }
            }
            ApplyOutcome::AdminBypassed => HandleEntitlementWebhookResult::AdminBypassed { event_id },
        })
    }

    fn identity_failure(&self, event_id: &str, err: AccessError) -> WebhookError {
        error!(event_id = %event_id, error = %err, "Could not resolve Plex identity");
        WebhookError::from(err)
    }
}

/// Derives a stable correlation id so redeliveries of one event share it.
fn correlation_for_event(event_id: &str) -> CorrelationId {
    let digest = Sha256::digest(event_id.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    CorrelationId::from_uuid(Uuid::from_bytes(bytes))
}
