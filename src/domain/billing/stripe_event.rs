//! Stripe webhook event types.
//!
//! Only fields relevant to our processing are captured.

use serde::{Deserialize, Serialize};

/// Stripe webhook event (simplified).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "entitlements.active_entitlement_summary.updated").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    /// Returns true if this is a live mode event.
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    /// Attempts to deserialize `previous_attributes`, `None` when absent.
    pub fn deserialize_previous<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<Option<T>, serde_json::Error> {
        self.data
            .previous_attributes
            .clone()
            .map(serde_json::from_value)
            .transpose()
    }
}

/// Known Stripe event types that we handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// A customer's set of active entitlements changed.
    ActiveEntitlementSummaryUpdated,
    /// Unknown or unhandled event type.
    Unknown,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "entitlements.active_entitlement_summary.updated" => {
                Self::ActiveEntitlementSummaryUpdated
            }
            _ => Self::Unknown,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveEntitlementSummaryUpdated => {
                "entitlements.active_entitlement_summary.updated"
            }
            Self::Unknown => "unknown",
        }
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    previous_attributes: Option<serde_json::Value>,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: StripeEventType::ActiveEntitlementSummaryUpdated
                .as_str()
                .to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            previous_attributes: None,
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn previous_attributes(mut self, attrs: serde_json::Value) -> Self {
        self.previous_attributes = Some(attrs);
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    /// Sets an entitlement summary for `customer` with the given lookup keys.
    pub fn entitlements(self, customer: &str, lookup_keys: &[&str]) -> Self {
        self.object(summary_json(customer, lookup_keys))
    }

    /// Sets the previous entitlement list to the given lookup keys.
    pub fn previous_entitlements(self, lookup_keys: &[&str]) -> Self {
        self.previous_attributes(serde_json::json!({
            "entitlements": { "object": "list", "data": entitlement_items(lookup_keys) }
        }))
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
                previous_attributes: self.previous_attributes,
            },
            livemode: self.livemode,
            api_version: Some("2024-06-20".to_string()),
        }
    }
}

#[cfg(test)]
fn entitlement_items(lookup_keys: &[&str]) -> Vec<serde_json::Value> {
    lookup_keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            serde_json::json!({
                "id": format!("ent_test_{}", i),
                "object": "entitlements.active_entitlement",
                "feature": format!("feat_{}", key),
                "livemode": false,
                "lookup_key": key,
            })
        })
        .collect()
}

#[cfg(test)]
fn summary_json(customer: &str, lookup_keys: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "object": "entitlements.active_entitlement_summary",
        "customer": customer,
        "livemode": false,
        "entitlements": {
            "object": "list",
            "data": entitlement_items(lookup_keys),
            "has_more": false,
            "url": "/v1/customer/entitlements",
        }
    })
}
