//! In-memory adapters for tests and local runs.

mod access_directory;

pub use access_directory::InMemoryAccessDirectory;
