//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod billing;
pub mod invites;
pub mod provisioning;
pub mod users;
