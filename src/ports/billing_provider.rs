//! Billing provider port.
//!
//! The webhook path only needs to read customers; checkout and portal
//! sessions live outside this service.

use async_trait::async_trait;

use crate::domain::access::AccessError;
use crate::domain::billing::BillingCustomer;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Port for billing provider lookups.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Get customer by provider ID. `None` if the customer does not exist.
    async fn get_customer(&self, customer_id: &str)
        -> Result<Option<BillingCustomer>, BillingError>;
}

/// Error codes for billing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,
    /// API authentication failed.
    AuthenticationError,
    /// Resource not found.
    NotFound,
    /// Provider API error.
    ProviderError,
}

impl BillingErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BillingErrorCode::NetworkError | BillingErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for BillingErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BillingErrorCode::NetworkError => "network_error",
            BillingErrorCode::AuthenticationError => "authentication_error",
            BillingErrorCode::NotFound => "not_found",
            BillingErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

/// Errors from billing provider operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingError {
    pub code: BillingErrorCode,
    pub message: String,
    /// Provider's error code (if available).
    pub provider_code: Option<String>,
    pub retryable: bool,
}

impl BillingError {
    pub fn new(code: BillingErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::AuthenticationError, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(BillingErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(BillingErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for BillingError {}

impl From<BillingError> for AccessError {
    fn from(err: BillingError) -> Self {
        AccessError::Billing(err.to_string())
    }
}

impl From<BillingError> for DomainError {
    fn from(err: BillingError) -> Self {
        DomainError::new(ErrorCode::BillingProviderError, err.to_string())
    }
}
