//! Plex media access adapters.
//!
//! - `PlexMediaClient` - reqwest client for plex.tv / clients.plex.tv
//! - `MockMediaAccessClient` - recording mock with failure injection

mod api_types;
mod mock_media_client;
mod plex_client;

pub use api_types::AccountResponse;
pub use mock_media_client::{MediaCall, MockMediaAccessClient};
pub use plex_client::{PlexConfig, PlexMediaClient};
