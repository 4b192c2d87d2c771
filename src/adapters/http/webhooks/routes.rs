//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use crate::adapters::http::state::AppState;

use super::handlers::handle_stripe_webhook;

/// Create the webhook router.
///
/// # Routes
/// - `POST /stripe/webhook` - Stripe entitlement summary events
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe/webhook", post(handle_stripe_webhook))
}
