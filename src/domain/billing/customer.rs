//! Billing customer as seen by the provisioning engine.

use std::collections::HashMap;

/// Metadata key holding the email of the customer's Plex account.
pub const PLEX_EMAIL_METADATA_KEY: &str = "plex_email";

/// Metadata key holding the customer's Plex account id.
pub const PLEX_USER_ID_METADATA_KEY: &str = "plex_user_id";

/// A Stripe customer record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingCustomer {
    pub id: String,
    pub email: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl BillingCustomer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns a metadata value if present and non-blank.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Returns the primary email if present and non-blank.
    pub fn primary_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_treated_as_absent() {
        let customer = BillingCustomer::new("cus_1")
            .with_email("   ")
            .with_metadata(PLEX_EMAIL_METADATA_KEY, "");
        assert_eq!(customer.primary_email(), None);
        assert_eq!(customer.metadata_value(PLEX_EMAIL_METADATA_KEY), None);
    }

    #[test]
    fn values_are_trimmed() {
        let customer = BillingCustomer::new("cus_1")
            .with_email(" a@example.com ")
            .with_metadata(PLEX_USER_ID_METADATA_KEY, " 42 ");
        assert_eq!(customer.primary_email(), Some("a@example.com"));
        assert_eq!(customer.metadata_value(PLEX_USER_ID_METADATA_KEY), Some("42"));
    }
}
