//! In-Memory Access Directory Adapter
//!
//! Holds codes, users, redemptions and tokens behind a single lock so the
//! redemption write is atomic the same way the SQL transaction is.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, InviteCodeId, PlexUserId, Timestamp};
use crate::domain::invites::{
    InviteCode, InviteRedemption, NewInviteCode, PlexUserInvite, Redeemer, UserInviteDetail,
};
use crate::domain::users::{PlexToken, PlexUserRecord};
use crate::ports::{InviteCodeRepository, PlexTokenRepository, PlexUserRepository};

#[derive(Debug, Default)]
struct DirectoryState {
    codes: Vec<InviteCode>,
    users: HashMap<PlexUserId, PlexUserRecord>,
    invites: Vec<PlexUserInvite>,
    tokens: HashMap<PlexUserId, PlexToken>,
    next_code_id: i64,
    next_invite_id: i64,
}

/// In-memory access directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccessDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryAccessDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored codes, including disabled ones.
    pub async fn code_count(&self) -> usize {
        self.state.read().await.codes.len()
    }

    /// Number of stored users.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

#[async_trait]
impl InviteCodeRepository for InMemoryAccessDirectory {
    async fn save(&self, code: &NewInviteCode) -> Result<InviteCode, DomainError> {
        let mut state = self.state.write().await;
        if state.codes.iter().any(|c| c.code == code.code) {
            return Err(DomainError::validation(
                "invite_code",
                "invite_code already exists",
            ));
        }

        state.next_code_id += 1;
        let saved = code
            .clone()
            .into_invite_code(InviteCodeId::new(state.next_code_id), Timestamp::now());
        state.codes.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: InviteCodeId) -> Result<Option<InviteCode>, DomainError> {
        let state = self.state.read().await;
        Ok(state.codes.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<InviteCode>, DomainError> {
        let state = self.state.read().await;
        Ok(state.codes.iter().find(|c| c.code == code).cloned())
    }

    async fn list_active(&self) -> Result<Vec<InviteCode>, DomainError> {
        let state = self.state.read().await;
        let mut codes: Vec<_> = state.codes.iter().filter(|c| !c.is_disabled).cloned().collect();
        codes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(codes)
    }

    async fn disable(&self, id: InviteCodeId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.codes.iter_mut().find(|c| c.id == id) {
            Some(code) => {
                code.is_disabled = true;
                code.updated_at = Timestamp::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn redeem(&self, redemption: &InviteRedemption) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&redemption.user_id) {
            return Err(DomainError::database(format!(
                "Failed to record redemption: unknown user {}",
                redemption.user_id
            )));
        }

        let Some(code) = state.codes.iter_mut().find(|c| {
            c.id == redemption.invite_code_id
                && !c.is_disabled
                && c.max_uses.map_or(true, |max| c.used_count < max)
        }) else {
            return Ok(false);
        };
        code.used_count += 1;
        code.updated_at = redemption.used_at;

        if let Some(existing) = state.invites.iter_mut().find(|i| {
            i.user_id == redemption.user_id && i.invite_code_id == redemption.invite_code_id
        }) {
            existing.used_at = redemption.used_at;
            existing.expires_at = redemption.expires_at;
            return Ok(true);
        }

        state.next_invite_id += 1;
        let id = state.next_invite_id;
        state.invites.push(PlexUserInvite {
            id,
            user_id: redemption.user_id,
            invite_code_id: redemption.invite_code_id,
            used_at: redemption.used_at,
            expires_at: redemption.expires_at,
        });
        Ok(true)
    }

    async fn list_redeemers(&self, id: InviteCodeId) -> Result<Vec<Redeemer>, DomainError> {
        let state = self.state.read().await;
        let mut redeemers: Vec<Redeemer> = state
            .invites
            .iter()
            .filter(|i| i.invite_code_id == id)
            .filter_map(|i| {
                state.users.get(&i.user_id).map(|user| Redeemer {
                    user: user.clone(),
                    used_at: i.used_at,
                    expires_at: i.expires_at,
                })
            })
            .collect();
        redeemers.sort_by(|a, b| a.user.username.cmp(&b.user.username));
        Ok(redeemers)
    }
}

#[async_trait]
impl PlexUserRepository for InMemoryAccessDirectory {
    async fn upsert(&self, user: &PlexUserRecord) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&user.id) {
            Some(existing) => {
                existing.uuid = user.uuid.clone();
                existing.username = user.username.clone();
                existing.email = user.email.clone();
                existing.is_admin = user.is_admin;
                existing.updated_at = user.updated_at;
            }
            None => {
                state.users.insert(user.id, user.clone());
            }
        }
        Ok(())
    }

    async fn insert_if_missing(&self, user: &PlexUserRecord) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.users.entry(user.id).or_insert_with(|| user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PlexUserId) -> Result<Option<PlexUserRecord>, DomainError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<PlexUserRecord>, DomainError> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(None);
        }
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| u.email.eq_ignore_ascii_case(email))
            .min_by_key(|u| u.id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<PlexUserRecord>, DomainError> {
        let state = self.state.read().await;
        let mut users: Vec<_> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn delete(&self, id: PlexUserId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.tokens.remove(&id);
        state.invites.retain(|i| i.user_id != id);
        Ok(true)
    }

    async fn update_notes(
        &self,
        id: PlexUserId,
        notes: Option<&str>,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                user.notes = notes.map(String::from);
                user.updated_at = Timestamp::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_invites(&self, id: PlexUserId) -> Result<Vec<UserInviteDetail>, DomainError> {
        let state = self.state.read().await;
        let mut details: Vec<UserInviteDetail> = state
            .invites
            .iter()
            .filter(|i| i.user_id == id)
            .filter_map(|i| {
                state
                    .codes
                    .iter()
                    .find(|c| c.id == i.invite_code_id)
                    .map(|code| UserInviteDetail {
                        invite: i.clone(),
                        code: code.code.clone(),
                        entitlement_name: code.entitlement_name.clone(),
                    })
            })
            .collect();
        details.sort_by(|a, b| b.invite.used_at.cmp(&a.invite.used_at));
        Ok(details)
    }
}

#[async_trait]
impl PlexTokenRepository for InMemoryAccessDirectory {
    async fn upsert(&self, token: &PlexToken) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&token.user_id) {
            return Err(DomainError::database(format!(
                "Failed to upsert plex token: unknown user {}",
                token.user_id
            )));
        }
        let created_at = state
            .tokens
            .get(&token.user_id)
            .map_or(token.created_at, |existing| existing.created_at);
        state.tokens.insert(
            token.user_id,
            PlexToken {
                created_at,
                ..token.clone()
            },
        );
        Ok(())
    }

    async fn find_by_user(&self, user_id: PlexUserId) -> Result<Option<PlexToken>, DomainError> {
        Ok(self.state.read().await.tokens.get(&user_id).cloned())
    }
}
