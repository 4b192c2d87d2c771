//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `plex_session` - Resolves callers from their Plex token via plex.tv
//! - `mock` - Test implementation that doesn't require external services

mod mock;
mod plex_session;

pub use mock::MockSessionValidator;
pub use plex_session::PlexSessionValidator;
