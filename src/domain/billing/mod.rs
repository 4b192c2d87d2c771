//! Billing domain module.
//!
//! Stripe webhook verification and the Entitlement Interpreter.
//!
//! # Module Structure
//!
//! - `stripe_event` - Webhook event envelope
//! - `entitlement` - Active entitlement summary payload
//! - `customer` - Billing customer and the metadata keys we read
//! - `webhook_verifier` - HMAC-SHA256 signature verification
//! - `webhook_errors` - Webhook failures and their HTTP status
//! - `interpreter` - Grant/revoke decisions and identity resolution

mod customer;
mod entitlement;
mod interpreter;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use customer::{BillingCustomer, PLEX_EMAIL_METADATA_KEY, PLEX_USER_ID_METADATA_KEY};
pub use entitlement::{
    ActiveEntitlement, ActiveEntitlementSummary, EntitlementList, PreviousEntitlementSummary,
};
pub use interpreter::{EntitlementDecision, EntitlementInterpreter};
pub use stripe_event::{StripeEvent, StripeEventData, StripeEventType};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
