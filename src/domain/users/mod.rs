//! Users domain module.
//!
//! Plex accounts known to this system and their stored auth tokens.

mod plex_user;
mod token;

pub use plex_user::PlexUserRecord;
pub use token::PlexToken;
