//! ListUsersHandler - Query handler for known users and their live access.

use std::sync::Arc;

use crate::domain::access::AccessError;
use crate::domain::foundation::PlexUserId;
use crate::domain::users::PlexUserRecord;
use crate::ports::{MediaAccessClient, PlexUserRepository};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListUsersQuery;

/// A stored user with their current share state at Plex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithAccess {
    pub user: PlexUserRecord,
    pub has_access: bool,
}

/// Lists users ordered by username.
///
/// Plex's user list is fetched once and matched against every record.
/// The server owner always has access.
pub struct ListUsersHandler {
    users: Arc<dyn PlexUserRepository>,
    media: Arc<dyn MediaAccessClient>,
    admin_user_id: PlexUserId,
}

impl ListUsersHandler {
    pub fn new(
        users: Arc<dyn PlexUserRepository>,
        media: Arc<dyn MediaAccessClient>,
        admin_user_id: PlexUserId,
    ) -> Self {
        Self {
            users,
            media,
            admin_user_id,
        }
    }

    pub async fn handle(&self, _query: ListUsersQuery) -> Result<Vec<UserWithAccess>, AccessError> {
        let records = self.users.list().await?;
        let shared = self.media.shared_user_ids().await?;

        Ok(records
            .into_iter()
            .map(|user| {
                let has_access = user.id == self.admin_user_id || shared.contains(&user.id);
                UserWithAccess { user, has_access }
            })
            .collect())
    }
}
