//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresAccessDirectory` - Invite codes, users, redemptions and tokens

mod access_directory;

pub use access_directory::{PostgresAccessDirectory, MIGRATOR};
