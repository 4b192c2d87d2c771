//! Access change requests.
//!
//! Both entitlement sources (Stripe entitlement events and invite-code
//! redemption) normalize into an [`AccessChangeRequest`], which the
//! provisioning orchestrator consumes immediately. Requests are never stored.

use std::fmt;

use crate::domain::foundation::{CorrelationId, InviteCodeId, PlexUserId};

/// The two actions the orchestrator can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessAction {
    Grant,
    Revoke,
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessAction::Grant => write!(f, "grant"),
            AccessAction::Revoke => write!(f, "revoke"),
        }
    }
}

/// Who the change targets.
///
/// Shares are addressed by email, unshares by Plex user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessSubject {
    Email(String),
    UserId(PlexUserId),
}

impl fmt::Display for AccessSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessSubject::Email(email) => write!(f, "email:{}", email),
            AccessSubject::UserId(id) => write!(f, "user:{}", id),
        }
    }
}

/// What triggered the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessSource {
    /// A Stripe active-entitlement-summary event.
    BillingEntitlement { event_id: String, customer_id: String },

    /// A successful invite code redemption.
    InviteRedemption { code_id: InviteCodeId },

    /// An administrator acting through the user management API.
    Administrator { admin_id: PlexUserId },
}

impl AccessSource {
    pub fn kind(&self) -> &'static str {
        match self {
            AccessSource::BillingEntitlement { .. } => "billing_entitlement",
            AccessSource::InviteRedemption { .. } => "invite_redemption",
            AccessSource::Administrator { .. } => "administrator",
        }
    }
}

/// A normalized grant or revoke for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessChangeRequest {
    pub action: AccessAction,
    pub subject: AccessSubject,
    pub source: AccessSource,
    pub correlation_id: CorrelationId,
}

impl AccessChangeRequest {
    pub fn grant(subject: AccessSubject, source: AccessSource) -> Self {
        Self {
            action: AccessAction::Grant,
            subject,
            source,
            correlation_id: CorrelationId::new(),
        }
    }

    pub fn revoke(subject: AccessSubject, source: AccessSource) -> Self {
        Self {
            action: AccessAction::Revoke,
            subject,
            source,
            correlation_id: CorrelationId::new(),
        }
    }

    /// Replaces the generated correlation id, e.g. to tie it to an upstream request.
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}
