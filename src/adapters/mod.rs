//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` / `sqlite` - Access directory on either database engine
//! - `memory` - Access directory for tests and local runs
//! - `plex` - Library sharing through the Plex API
//! - `stripe` - Customer lookup for entitlement changes
//! - `auth` - Caller resolution from Plex tokens
//! - `http` - axum routes, middleware and DTOs

pub mod auth;
pub mod http;
pub mod memory;
pub mod plex;
pub mod postgres;
pub mod sqlite;
pub mod stripe;

pub(crate) mod sql_rows;

pub use auth::{MockSessionValidator, PlexSessionValidator};
pub use memory::InMemoryAccessDirectory;
pub use plex::{MockMediaAccessClient, PlexConfig, PlexMediaClient};
pub use postgres::PostgresAccessDirectory;
pub use sqlite::SqliteAccessDirectory;
pub use stripe::{MockBillingProvider, StripeBillingAdapter, StripeConfig};
