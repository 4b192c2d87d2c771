//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the authenticated caller, and error types
//! shared by every other domain module.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CorrelationId, InviteCodeId, PlexUserId};
pub use timestamp::Timestamp;
