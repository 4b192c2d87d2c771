//! Mock media access client for testing.
//!
//! Records every call and keeps a set of users with access so grant and
//! revoke flows can be asserted end to end without Plex.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::PlexUserId;
use crate::ports::{MediaAccessClient, MediaError, ShareResult};

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    Share { email: String },
    Unshare { user_id: PlexUserId },
    ListUsers,
    Accept { token: String, invite_id: i64 },
    ResolveSections { names: Vec<String> },
}

#[derive(Default)]
struct MockState {
    calls: Vec<MediaCall>,
    /// Users with access right now.
    shared: HashSet<PlexUserId>,
    /// Email to Plex account id, used to fill `invited_user_id` on share.
    accounts: HashMap<String, PlexUserId>,
    next_invite_id: i64,
    share_error: Option<MediaError>,
    unshare_error: Option<MediaError>,
    accept_error: Option<MediaError>,
    list_error: Option<MediaError>,
}

/// Recording mock of the Plex sharing API.
#[derive(Default, Clone)]
pub struct MockMediaAccessClient {
    inner: Arc<Mutex<MockState>>,
}

impl MockMediaAccessClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Register a Plex account so shares to `email` report its id.
    pub fn with_account(self, email: impl Into<String>, user_id: PlexUserId) -> Self {
        self.state()
            .accounts
            .insert(email.into().to_lowercase(), user_id);
        self
    }

    /// Mark a user as already having access.
    pub fn with_shared_user(self, user_id: PlexUserId) -> Self {
        self.state().shared.insert(user_id);
        self
    }

    pub fn fail_share(&self, error: MediaError) {
        self.state().share_error = Some(error);
    }

    pub fn fail_unshare(&self, error: MediaError) {
        self.state().unshare_error = Some(error);
    }

    pub fn fail_accept(&self, error: MediaError) {
        self.state().accept_error = Some(error);
    }

    pub fn fail_list(&self, error: MediaError) {
        self.state().list_error = Some(error);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.share_error = None;
        state.unshare_error = None;
        state.accept_error = None;
        state.list_error = None;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MediaCall> {
        self.state().calls.clone()
    }

    /// Emails passed to `share_library`, in order.
    pub fn shared_emails(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                MediaCall::Share { email } => Some(email.clone()),
                _ => None,
            })
            .collect()
    }

    /// User ids passed to `unshare_library`, in order.
    pub fn unshared_users(&self) -> Vec<PlexUserId> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                MediaCall::Unshare { user_id } => Some(*user_id),
                _ => None,
            })
            .collect()
    }

    /// Invite ids accepted, in order.
    pub fn accepted_invites(&self) -> Vec<i64> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| match c {
                MediaCall::Accept { invite_id, .. } => Some(*invite_id),
                _ => None,
            })
            .collect()
    }

    pub fn has_access(&self, user_id: PlexUserId) -> bool {
        self.state().shared.contains(&user_id)
    }
}

#[async_trait]
impl MediaAccessClient for MockMediaAccessClient {
    async fn share_library(&self, email: &str) -> Result<ShareResult, MediaError> {
        let mut state = self.state();
        state.calls.push(MediaCall::Share {
            email: email.to_string(),
        });
        if let Some(error) = state.share_error.clone() {
            return Err(error);
        }

        state.next_invite_id += 1;
        let invite_id = state.next_invite_id;
        let invited_user_id = state.accounts.get(&email.to_lowercase()).copied();
        if let Some(user_id) = invited_user_id {
            state.shared.insert(user_id);
        }

        Ok(ShareResult {
            invite_id,
            invited_user_id,
        })
    }

    async fn unshare_library(&self, user_id: PlexUserId) -> Result<(), MediaError> {
        let mut state = self.state();
        state.calls.push(MediaCall::Unshare { user_id });
        if let Some(error) = state.unshare_error.clone() {
            return Err(error);
        }
        state.shared.remove(&user_id);
        Ok(())
    }

    async fn shared_user_ids(&self) -> Result<HashSet<PlexUserId>, MediaError> {
        let mut state = self.state();
        state.calls.push(MediaCall::ListUsers);
        if let Some(error) = state.list_error.clone() {
            return Err(error);
        }
        Ok(state.shared.clone())
    }

    async fn accept_invite(
        &self,
        user_token: &SecretString,
        invite_id: i64,
    ) -> Result<(), MediaError> {
        let mut state = self.state();
        state.calls.push(MediaCall::Accept {
            token: user_token.expose_secret().clone(),
            invite_id,
        });
        match state.accept_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn resolve_sections(&self, names: &[String]) -> Result<Vec<i64>, MediaError> {
        self.state().calls.push(MediaCall::ResolveSections {
            names: names.to_vec(),
        });
        Ok((1..=names.len() as i64).collect())
    }
}
