//! RecordLoginHandler - Command handler for remembering a Plex login.
//!
//! Stores the account and its token so later grants can accept the share
//! invitation on the user's behalf.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::domain::access::AccessError;
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::domain::users::{PlexToken, PlexUserRecord};
use crate::ports::{PlexTokenRepository, PlexUserRepository};

/// Command to record a successful login.
#[derive(Debug, Clone)]
pub struct RecordLoginCommand {
    pub user: AuthenticatedUser,
    /// The caller's own Plex token.
    pub token: SecretString,
}

pub struct RecordLoginHandler {
    users: Arc<dyn PlexUserRepository>,
    tokens: Arc<dyn PlexTokenRepository>,
}

impl RecordLoginHandler {
    pub fn new(users: Arc<dyn PlexUserRepository>, tokens: Arc<dyn PlexTokenRepository>) -> Self {
        Self { users, tokens }
    }

    /// Upserts the user, then the token. Returns the stored record.
    pub async fn handle(&self, cmd: RecordLoginCommand) -> Result<PlexUserRecord, AccessError> {
        let now = Timestamp::now();
        let record = PlexUserRecord::from_identity(&cmd.user, now);
        self.users.upsert(&record).await?;
        self.tokens
            .upsert(&PlexToken::new(
                cmd.user.id,
                cmd.token.expose_secret().as_str(),
                now,
            ))
            .await?;

        info!(user_id = %cmd.user.id, is_admin = cmd.user.is_admin, "Recorded Plex login");

        Ok(self.users.find_by_id(cmd.user.id).await?.unwrap_or(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccessDirectory;
    use crate::domain::foundation::PlexUserId;

    fn login(token: &str) -> RecordLoginCommand {
        RecordLoginCommand {
            user: AuthenticatedUser::new(
                PlexUserId::new(12).unwrap(),
                "uuid-12",
                "viewer",
                Some("viewer@example.com".into()),
                false,
            ),
            token: SecretString::new(token.to_string()),
        }
    }

    #[tokio::test]
    async fn stores_user_and_latest_token() {
        let dir = InMemoryAccessDirectory::new();
        let handler = RecordLoginHandler::new(Arc::new(dir.clone()), Arc::new(dir.clone()));

        handler.handle(login("first")).await.unwrap();
        let record = handler.handle(login("second")).await.unwrap();

        assert_eq!(record.username, "viewer");
        let token = dir.find_by_user(record.id).await.unwrap().unwrap();
        assert_eq!(token.access_token.expose_secret(), "second");
        assert_eq!(dir.user_count().await, 1);
    }

    #[tokio::test]
    async fn keeps_admin_notes_across_logins() {
        let dir = InMemoryAccessDirectory::new();
        let handler = RecordLoginHandler::new(Arc::new(dir.clone()), Arc::new(dir.clone()));
        let record = handler.handle(login("t")).await.unwrap();
        dir.update_notes(record.id, Some("family")).await.unwrap();

        let again = handler.handle(login("t")).await.unwrap();

        assert_eq!(again.notes.as_deref(), Some("family"));
    }
}
