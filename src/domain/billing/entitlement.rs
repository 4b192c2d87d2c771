//! Stripe active entitlement summary payloads.

use serde::Deserialize;

/// Data object of an `entitlements.active_entitlement_summary.updated` event.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveEntitlementSummary {
    /// Stripe customer id (cus_xxx).
    pub customer: String,

    #[serde(default)]
    pub entitlements: EntitlementList,
}

/// The `previous_attributes` of a summary update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviousEntitlementSummary {
    #[serde(default)]
    pub entitlements: EntitlementList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntitlementList {
    #[serde(default)]
    pub data: Vec<ActiveEntitlement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveEntitlement {
    #[serde(default)]
    pub id: String,

    /// Feature lookup key configured in the Stripe dashboard.
    #[serde(default)]
    pub lookup_key: String,
}

impl EntitlementList {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn contains(&self, lookup_key: &str) -> bool {
        self.data.iter().any(|e| e.lookup_key == lookup_key)
    }
}
