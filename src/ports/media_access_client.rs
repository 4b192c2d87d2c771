//! Media access port for the Plex sharing API.
//!
//! Implementations hold the admin credentials and the configured server and
//! library names; callers only say who to share with or unshare from.

use std::collections::HashSet;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::access::AccessError;
use crate::domain::foundation::{DomainError, ErrorCode, PlexUserId};

/// Port for granting and revoking library access on the media server.
#[async_trait]
pub trait MediaAccessClient: Send + Sync {
    /// Share the configured libraries with `email`.
    ///
    /// Library names are matched case-insensitively against the server's
    /// sections; unmatched names are skipped. Permissions are conservative:
    /// no sync, no channels, no tuners.
    async fn share_library(&self, email: &str) -> Result<ShareResult, MediaError>;

    /// Remove a user's share. 200 and 204 are success.
    async fn unshare_library(&self, user_id: PlexUserId) -> Result<(), MediaError>;

    /// Ids of every user whose server list includes the configured server.
    async fn shared_user_ids(&self) -> Result<HashSet<PlexUserId>, MediaError>;

    /// Whether `user_id` currently has access to the configured server.
    ///
    /// An unknown user, or a user without the server, is `false`.
    async fn user_has_access(&self, user_id: PlexUserId) -> Result<bool, MediaError> {
        Ok(self.shared_user_ids().await?.contains(&user_id))
    }

    /// Accept a pending share using the invited user's own token.
    async fn accept_invite(&self, user_token: &SecretString, invite_id: i64)
        -> Result<(), MediaError>;

    /// Resolve library names to section ids on the configured server.
    async fn resolve_sections(&self, names: &[String]) -> Result<Vec<i64>, MediaError>;
}

/// Outcome of a successful share call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareResult {
    /// Id of the pending share invitation.
    pub invite_id: i64,

    /// Plex account of the invitee; `None` when the email has no account yet.
    pub invited_user_id: Option<PlexUserId>,
}

/// Category of a media API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorCode {
    /// 401 from Plex.
    InvalidCredential,
    /// 400 from Plex.
    BadRequest,
    /// Any other non-success status, including 429.
    UnexpectedStatus,
    /// Connection failure or timeout.
    Network,
    /// Body could not be decoded.
    InvalidResponse,
    /// Local misconfiguration.
    Configuration,
}

impl std::fmt::Display for MediaErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MediaErrorCode::InvalidCredential => "invalid_credential",
            MediaErrorCode::BadRequest => "bad_request",
            MediaErrorCode::UnexpectedStatus => "unexpected_status",
            MediaErrorCode::Network => "network_error",
            MediaErrorCode::InvalidResponse => "invalid_response",
            MediaErrorCode::Configuration => "configuration_error",
        };
        write!(f, "{}", s)
    }
}

/// Errors from media provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaError {
    pub code: MediaErrorCode,
    pub message: String,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
}

impl MediaError {
    pub fn new(code: MediaErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn invalid_credential() -> Self {
        Self::new(MediaErrorCode::InvalidCredential, "Plex rejected the token").with_status(401)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(MediaErrorCode::BadRequest, message).with_status(400)
    }

    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::new(MediaErrorCode::UnexpectedStatus, body).with_status(status)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(MediaErrorCode::Network, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(MediaErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(MediaErrorCode::Configuration, message)
    }

    /// Plex answers a re-share of an existing share with 400 "Already shared".
    pub fn is_already_shared(&self) -> bool {
        self.code == MediaErrorCode::BadRequest
            && self.message.to_lowercase().contains("already shared")
    }
}

impl std::fmt::Display for MediaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}): {}", self.code, status, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for MediaError {}

impl From<MediaError> for AccessError {
    fn from(err: MediaError) -> Self {
        AccessError::Provider(err.to_string())
    }
}

impl From<MediaError> for DomainError {
    fn from(err: MediaError) -> Self {
        DomainError::new(ErrorCode::MediaProviderError, err.to_string())
    }
}
