//! ListUserInvitesHandler - Query handler for a user's redemptions.

use std::sync::Arc;

use crate::domain::access::AccessError;
use crate::domain::foundation::{PlexUserId, Timestamp};
use crate::domain::invites::UserInviteDetail;
use crate::ports::PlexUserRepository;

#[derive(Debug, Clone, Copy)]
pub struct ListUserInvitesQuery {
    pub user_id: PlexUserId,
}

/// A redemption and whether the access it granted is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInviteView {
    pub detail: UserInviteDetail,
    pub active: bool,
}

pub struct ListUserInvitesHandler {
    users: Arc<dyn PlexUserRepository>,
}

impl ListUserInvitesHandler {
    pub fn new(users: Arc<dyn PlexUserRepository>) -> Self {
        Self { users }
    }

    /// Most recent first. 404 for an unknown user.
    pub async fn handle(
        &self,
        query: ListUserInvitesQuery,
    ) -> Result<Vec<UserInviteView>, AccessError> {
        if self.users.find_by_id(query.user_id).await?.is_none() {
            return Err(AccessError::not_found("plex_user", query.user_id));
        }

        let now = Timestamp::now();
        Ok(self
            .users
            .list_invites(query.user_id)
            .await?
            .into_iter()
            .map(|detail| UserInviteView {
                active: detail.invite.is_active(&now),
                detail,
            })
            .collect())
    }
}
