//! HTTP adapter for Stripe webhooks.
//!
//! Deliveries are authenticated by their signature, not by a Plex token.

mod dto;
mod handlers;
mod routes;

pub use dto::WebhookAckResponse;
pub use handlers::handle_stripe_webhook;
pub use routes::webhook_routes;
