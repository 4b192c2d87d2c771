//! Provisioning handlers.
//!
//! The orchestrator that turns access change requests into Plex shares.

mod orchestrator;

pub use orchestrator::{ApplyOutcome, InviteAcceptance, ProvisioningOrchestrator};
