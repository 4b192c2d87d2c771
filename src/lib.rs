//! Plexgate - Access provisioning for a Plex media server
//!
//! Turns Stripe entitlement changes and redeemed invite codes into Plex
//! library shares, and revokes them when entitlements lapse.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
