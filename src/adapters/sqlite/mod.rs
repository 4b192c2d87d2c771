//! SQLite adapters - Embedded database implementations for repository ports.
//!
//! - `SqliteAccessDirectory` - Invite codes, users, redemptions and tokens

mod access_directory;

pub use access_directory::{SqliteAccessDirectory, MIGRATOR};
