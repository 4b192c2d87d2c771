//! Stripe billing provider adapter.
//!
//! Implements the `BillingProvider` port with a single customer lookup,
//! which is all the entitlement webhook needs to resolve a Plex identity.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key).with_base_url("http://localhost:12111");
//! let adapter = StripeBillingAdapter::new(config)?;
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::BillingConfig;
use crate::domain::billing::BillingCustomer;
use crate::ports::{BillingError, BillingProvider};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Bound on every outbound request.
    timeout: Duration,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&BillingConfig> for StripeConfig {
    fn from(config: &BillingConfig) -> Self {
        StripeConfig::new(config.api_key.clone())
            .with_base_url(config.api_base_url.clone())
            .with_timeout(config.request_timeout())
    }
}

/// Customer object as returned by `GET /v1/customers/{id}`.
#[derive(Debug, Deserialize)]
struct StripeCustomer {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
    #[serde(default)]
    deleted: bool,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Stripe billing provider adapter.
pub struct StripeBillingAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeBillingAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Result<Self, BillingError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BillingError::provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Turns a non-success response into a `BillingError`.
    async fn error_from_response(response: reqwest::Response) -> BillingError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<StripeErrorEnvelope>(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(|e| e.error.message.clone())
            .unwrap_or(body);

        let error = if status == reqwest::StatusCode::UNAUTHORIZED {
            BillingError::authentication(format!("Stripe rejected API key: {}", message))
        } else {
            BillingError::provider(format!("Stripe API error ({}): {}", status.as_u16(), message))
        };

        match parsed.and_then(|e| e.error.code) {
            Some(code) => error.with_provider_code(code),
            None => error,
        }
    }
}

#[async_trait]
impl BillingProvider for StripeBillingAdapter {
    async fn get_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<BillingCustomer>, BillingError> {
        let url = format!("{}/v1/customers/{}", self.config.api_base_url, customer_id);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let error = Self::error_from_response(response).await;
            tracing::error!(customer_id, error = %error, "Stripe get_customer failed");
            return Err(error);
        }

        let stripe_customer: StripeCustomer = response.json().await.map_err(|e| {
            BillingError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        if stripe_customer.deleted {
            return Ok(None);
        }

        Ok(Some(BillingCustomer {
            id: stripe_customer.id,
            email: stripe_customer.email,
            metadata: stripe_customer.metadata,
        }))
    }
}
