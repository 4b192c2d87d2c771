//! Stripe billing adapter.
//!
//! Implements the `BillingProvider` port: customer lookup used to resolve
//! the Plex identity behind an entitlement change. Webhook signature
//! verification lives in the billing domain.
//!
//! # Configuration
//!
//! - `PLEXGATE__STRIPE__API_KEY`: Stripe secret API key
//! - `PLEXGATE__STRIPE__API_BASE_URL`: optional override for tests

mod mock_billing_provider;
mod stripe_adapter;

pub use mock_billing_provider::MockBillingProvider;
pub use stripe_adapter::{StripeBillingAdapter, StripeConfig};
