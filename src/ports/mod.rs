//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Access Directory
//!
//! - `InviteCodeRepository` - Invite codes and redemptions
//! - `PlexUserRepository` - Known Plex users
//! - `PlexTokenRepository` - Per-user Plex tokens
//!
//! ## External Services
//!
//! - `MediaAccessClient` - Plex library sharing
//! - `BillingProvider` - Stripe customer lookup
//! - `SessionValidator` - Caller identity resolution

mod billing_provider;
mod invite_code_repository;
mod media_access_client;
mod plex_token_repository;
mod plex_user_repository;
mod session_validator;

pub use billing_provider::{BillingError, BillingErrorCode, BillingProvider};
pub use invite_code_repository::InviteCodeRepository;
pub use media_access_client::{MediaAccessClient, MediaError, MediaErrorCode, ShareResult};
pub use plex_token_repository::PlexTokenRepository;
pub use plex_user_repository::PlexUserRepository;
pub use session_validator::SessionValidator;
