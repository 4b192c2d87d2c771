//! GetUserHandler - Query handler for one stored user.

use std::sync::Arc;

use crate::domain::access::AccessError;
use crate::domain::foundation::PlexUserId;
use crate::domain::users::PlexUserRecord;
use crate::ports::PlexUserRepository;

#[derive(Debug, Clone, Copy)]
pub struct GetUserQuery {
    pub user_id: PlexUserId,
}

pub struct GetUserHandler {
    users: Arc<dyn PlexUserRepository>,
}

impl GetUserHandler {
    pub fn new(users: Arc<dyn PlexUserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: GetUserQuery) -> Result<PlexUserRecord, AccessError> {
        self.users
            .find_by_id(query.user_id)
            .await?
            .ok_or_else(|| AccessError::not_found("plex_user", query.user_id))
    }
}
