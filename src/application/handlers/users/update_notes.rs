//! UpdateNotesHandler - Replace the administrator's notes on a user.

use std::sync::Arc;

use crate::domain::access::AccessError;
use crate::domain::foundation::PlexUserId;
use crate::ports::PlexUserRepository;

const MAX_NOTES_LENGTH: usize = 2000;

#[derive(Debug, Clone)]
pub struct UpdateNotesCommand {
    pub user_id: PlexUserId,
    /// `None` or blank clears the notes.
    pub notes: Option<String>,
}

pub struct UpdateNotesHandler {
    users: Arc<dyn PlexUserRepository>,
}

impl UpdateNotesHandler {
    pub fn new(users: Arc<dyn PlexUserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: UpdateNotesCommand) -> Result<(), AccessError> {
        let notes = cmd
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(notes) = notes {
            if notes.chars().count() > MAX_NOTES_LENGTH {
                return Err(AccessError::validation(
                    "notes",
                    format!("must be at most {} characters", MAX_NOTES_LENGTH),
                ));
            }
        }

        if !self.users.update_notes(cmd.user_id, notes).await? {
            return Err(AccessError::not_found("plex_user", cmd.user_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryAccessDirectory;
    use crate::domain::foundation::{AuthenticatedUser, Timestamp};
    use crate::domain::users::PlexUserRecord;

    async fn dir_with_user() -> (InMemoryAccessDirectory, PlexUserId) {
        let dir = InMemoryAccessDirectory::new();
        let id = PlexUserId::new(3).unwrap();
        let identity = AuthenticatedUser::new(id, "u3", "cat", None, false);
        PlexUserRepository::upsert(&dir, &PlexUserRecord::from_identity(&identity, Timestamp::now()))
            .await
            .unwrap();
        (dir, id)
    }

    #[tokio::test]
    async fn sets_and_clears_notes() {
        let (dir, id) = dir_with_user().await;
        let handler = UpdateNotesHandler::new(Arc::new(dir.clone()));

        handler
            .handle(UpdateNotesCommand {
                user_id: id,
                notes: Some("  sister  ".into()),
            })
            .await
            .unwrap();
        let set = PlexUserRepository::find_by_id(&dir, id).await.unwrap().unwrap();

        handler
            .handle(UpdateNotesCommand {
                user_id: id,
                notes: None,
            })
            .await
            .unwrap();
        let cleared = PlexUserRepository::find_by_id(&dir, id).await.unwrap().unwrap();

        assert_eq!(set.notes.as_deref(), Some("sister"));
        assert_eq!(cleared.notes, None);
    }

    #[tokio::test]
    async fn rejects_oversized_notes_and_unknown_users() {
        let (dir, id) = dir_with_user().await;
        let handler = UpdateNotesHandler::new(Arc::new(dir));

        let too_long = handler
            .handle(UpdateNotesCommand {
                user_id: id,
                notes: Some("x".repeat(MAX_NOTES_LENGTH + 1)),
            })
            .await;
        let missing = handler
            .handle(UpdateNotesCommand {
                user_id: PlexUserId::new(77).unwrap(),
                notes: Some("hi".into()),
            })
            .await;

        assert!(matches!(too_long, Err(AccessError::Validation { .. })));
        assert!(matches!(missing, Err(AccessError::NotFound { .. })));
    }
}
