//! HTTP handler for Stripe webhook deliveries.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::error::WebhookApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::billing::HandleEntitlementWebhookCommand;

use super::dto::WebhookAckResponse;

const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// POST /api/v1/stripe/webhook - Apply an entitlement change
///
/// The body is passed on untouched; the signature covers the raw bytes.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let handler = state.webhook_handler();
    let cmd = HandleEntitlementWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(WebhookAckResponse::from(result)))
}
