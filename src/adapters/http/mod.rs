//! HTTP adapters - REST API implementations.
//!
//! Each area has its own routes, DTOs and handlers:
//!
//! - `webhooks` - Stripe entitlement deliveries
//! - `invites` - Invite code administration and claiming
//! - `users` - Login recording, access checks and user administration

pub mod error;
pub mod invites;
pub mod middleware;
pub mod router;
pub mod state;
pub mod users;
pub mod webhooks;

pub use error::{ApiError, ErrorResponse, WebhookApiError};
pub use router::{api_router, health};
pub use state::{AccessSettings, AppState};
