//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The provisioning orchestrator is the single place where cross-system
//! effects are sequenced; every other handler either feeds it or reads.

pub mod handlers;

pub use handlers::provisioning::{ApplyOutcome, InviteAcceptance, ProvisioningOrchestrator};
