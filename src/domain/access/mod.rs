//! Access domain module.
//!
//! The normalized access change request shared by both entitlement sources,
//! and the error taxonomy of the provisioning engine.

mod errors;
mod request;

pub use errors::AccessError;
pub use request::{AccessAction, AccessChangeRequest, AccessSource, AccessSubject};
