//! Domain layer.
//!
//! Pure types and rules of the provisioning engine. Nothing here performs I/O.

pub mod access;
pub mod billing;
pub mod foundation;
pub mod invites;
pub mod users;
