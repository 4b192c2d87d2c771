//! CheckAccessHandler - Query handler for whether a user can see the libraries.

use std::sync::Arc;

use crate::domain::access::AccessError;
use crate::domain::foundation::PlexUserId;
use crate::ports::MediaAccessClient;

#[derive(Debug, Clone, Copy)]
pub struct CheckAccessQuery {
    pub user_id: PlexUserId,
}

/// Asks Plex whether the user is on the server's share list.
///
/// The server owner always has access and never triggers a lookup.
pub struct CheckAccessHandler {
    media: Arc<dyn MediaAccessClient>,
    admin_user_id: PlexUserId,
}

impl CheckAccessHandler {
    pub fn new(media: Arc<dyn MediaAccessClient>, admin_user_id: PlexUserId) -> Self {
        Self {
            media,
            admin_user_id,
        }
    }

    pub async fn handle(&self, query: CheckAccessQuery) -> Result<bool, AccessError> {
        if query.user_id == self.admin_user_id {
            return Ok(true);
        }
        Ok(self.media.user_has_access(query.user_id).await?)
    }
}
