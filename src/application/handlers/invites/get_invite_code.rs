//! GetInviteCodeHandler - Query handler for a code and who redeemed it.

use std::sync::Arc;

use crate::domain::access::AccessError;
use crate::domain::foundation::InviteCodeId;
use crate::domain::invites::{InviteCode, Redeemer};
use crate::ports::InviteCodeRepository;

#[derive(Debug, Clone, Copy)]
pub struct GetInviteCodeQuery {
    pub id: InviteCodeId,
}

#[derive(Debug, Clone)]
pub struct GetInviteCodeResult {
    pub invite_code: InviteCode,
    /// Ordered by username.
    pub redeemers: Vec<Redeemer>,
}

pub struct GetInviteCodeHandler {
    repository: Arc<dyn InviteCodeRepository>,
}

impl GetInviteCodeHandler {
    pub fn new(repository: Arc<dyn InviteCodeRepository>) -> Self {
        Self { repository }
    }

    /// Disabled codes are still returned here.
    pub async fn handle(&self, query: GetInviteCodeQuery) -> Result<GetInviteCodeResult, AccessError> {
        let invite_code = self
            .repository
            .find_by_id(query.id)
            .await?
            .ok_or_else(|| AccessError::not_found("invite_code", query.id))?;
        let redeemers = self.repository.list_redeemers(query.id).await?;

        Ok(GetInviteCodeResult {
            invite_code,
            redeemers,
        })
    }
}
