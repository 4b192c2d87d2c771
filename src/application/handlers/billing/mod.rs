//! Billing handlers.
//!
//! Stripe entitlement webhooks feeding the provisioning orchestrator.

mod handle_entitlement_webhook;

pub use handle_entitlement_webhook::{
    HandleEntitlementWebhookCommand, HandleEntitlementWebhookHandler,
    HandleEntitlementWebhookResult,
};
