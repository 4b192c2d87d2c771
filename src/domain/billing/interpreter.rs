//! Entitlement interpretation.
//!
//! Turns a verified Stripe event into a grant, a revoke or nothing, and maps
//! the Stripe customer onto the Plex identity the change should target.
//! No I/O happens here.

use crate::domain::access::{AccessChangeRequest, AccessError, AccessSource, AccessSubject};
use crate::domain::foundation::PlexUserId;

use super::customer::{BillingCustomer, PLEX_EMAIL_METADATA_KEY, PLEX_USER_ID_METADATA_KEY};
use super::entitlement::{ActiveEntitlementSummary, PreviousEntitlementSummary};
use super::stripe_event::{StripeEvent, StripeEventType};
use super::webhook_errors::WebhookError;

/// What an entitlement summary update means for media access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementDecision {
    /// The configured entitlement is active for the customer.
    Grant { customer_id: String },

    /// The customer lost every entitlement.
    Revoke { customer_id: String },

    /// Nothing to do.
    NoOp { customer_id: String, reason: String },
}

impl EntitlementDecision {
    pub fn customer_id(&self) -> &str {
        match self {
            EntitlementDecision::Grant { customer_id }
            | EntitlementDecision::Revoke { customer_id }
            | EntitlementDecision::NoOp { customer_id, .. } => customer_id,
        }
    }
}

/// Interprets `entitlements.active_entitlement_summary.updated` events.
#[derive(Debug, Clone)]
pub struct EntitlementInterpreter {
    entitlement_name: String,
}

impl EntitlementInterpreter {
    pub fn new(entitlement_name: impl Into<String>) -> Self {
        Self {
            entitlement_name: entitlement_name.into(),
        }
    }

    pub fn entitlement_name(&self) -> &str {
        &self.entitlement_name
    }

    /// Classifies an event.
    ///
    /// Additions are checked before removals: a summary that still has
    /// entries is never a revoke, even if some entry disappeared.
    ///
    /// # Errors
    ///
    /// - `Ignored` for every other event type
    /// - `ParseError` if the summary cannot be decoded
    pub fn interpret(&self, event: &StripeEvent) -> Result<EntitlementDecision, WebhookError> {
        if event.parsed_type() != StripeEventType::ActiveEntitlementSummaryUpdated {
            return Err(WebhookError::Ignored(format!(
                "unhandled event type {}",
                event.event_type
            )));
        }

        let summary: ActiveEntitlementSummary = event
            .deserialize_object()
            .map_err(|e| WebhookError::ParseError(format!("entitlement summary: {}", e)))?;
        let previous: PreviousEntitlementSummary = event
            .deserialize_previous()
            .map_err(|e| WebhookError::ParseError(format!("previous attributes: {}", e)))?
            .unwrap_or_default();

        let customer_id = summary.customer;

        if !summary.entitlements.is_empty() {
            if summary.entitlements.contains(&self.entitlement_name) {
                return Ok(EntitlementDecision::Grant { customer_id });
            }
            return Ok(EntitlementDecision::NoOp {
                customer_id,
                reason: format!("no entitlement with lookup key {}", self.entitlement_name),
            });
        }

        if !previous.entitlements.is_empty() {
            return Ok(EntitlementDecision::Revoke { customer_id });
        }

        Ok(EntitlementDecision::NoOp {
            customer_id,
            reason: "entitlement count unchanged".to_string(),
        })
    }

    /// Builds the access change for a decision, resolving the customer's Plex identity.
    ///
    /// Grants address the `plex_email` metadata value, falling back to the
    /// customer's primary email. Revokes need the `plex_user_id` metadata value.
    /// Returns `None` for a `NoOp`.
    pub fn resolve(
        &self,
        decision: &EntitlementDecision,
        event_id: &str,
        customer: &BillingCustomer,
    ) -> Result<Option<AccessChangeRequest>, AccessError> {
        let source = AccessSource::BillingEntitlement {
            event_id: event_id.to_string(),
            customer_id: customer.id.clone(),
        };

        let request = match decision {
            EntitlementDecision::NoOp { .. } => return Ok(None),
            EntitlementDecision::Grant { .. } => {
                let email = customer
                    .metadata_value(PLEX_EMAIL_METADATA_KEY)
                    .or_else(|| customer.primary_email())
                    .ok_or_else(|| {
                        AccessError::identity_resolution(
                            &customer.id,
                            "customer has neither plex_email metadata nor an email",
                        )
                    })?;
                AccessChangeRequest::grant(AccessSubject::Email(email.to_string()), source)
            }
            EntitlementDecision::Revoke { .. } => {
                let raw = customer
                    .metadata_value(PLEX_USER_ID_METADATA_KEY)
                    .ok_or_else(|| {
                        AccessError::identity_resolution(
                            &customer.id,
                            "customer has no plex_user_id metadata",
                        )
                    })?;
                let user_id: PlexUserId = raw.parse().map_err(|_| {
                    AccessError::identity_resolution(
                        &customer.id,
                        format!("plex_user_id metadata {:?} is not a valid id", raw),
                    )
                })?;
                AccessChangeRequest::revoke(AccessSubject::UserId(user_id), source)
            }
        };

        Ok(Some(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::AccessAction;
    use crate::domain::billing::stripe_event::StripeEventBuilder;

    fn interpreter() -> EntitlementInterpreter {
        EntitlementInterpreter::new("plex")
    }

    // ══════════════════════════════════════════════════════════════
    // Classification
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn matching_entitlement_grants() {
        let event = StripeEventBuilder::new()
            .entitlements("cus_1", &["plex"])
            .build();

        let decision = interpreter().interpret(&event).unwrap();

        assert_eq!(
            decision,
            EntitlementDecision::Grant {
                customer_id: "cus_1".into()
            }
        );
    }

    #[test]
    fn match_anywhere_in_list_grants() {
        let event = StripeEventBuilder::new()
            .entitlements("cus_1", &["music", "plex"])
            .previous_entitlements(&["music"])
            .build();

        assert!(matches!(
            interpreter().interpret(&event).unwrap(),
            EntitlementDecision::Grant { .. }
        ));
    }

    #[test]
    fn losing_all_entitlements_revokes() {
        let event = StripeEventBuilder::new()
            .entitlements("cus_2", &[])
            .previous_entitlements(&["plex"])
            .build();

        assert_eq!(
            interpreter().interpret(&event).unwrap(),
            EntitlementDecision::Revoke {
                customer_id: "cus_2".into()
            }
        );
    }

    #[test]
    fn non_matching_entitlement_is_noop() {
        let event = StripeEventBuilder::new()
            .entitlements("cus_3", &["other"])
            .build();

        assert!(matches!(
            interpreter().interpret(&event).unwrap(),
            EntitlementDecision::NoOp { .. }
        ));
    }

    #[test]
    fn partial_removal_is_not_a_revoke() {
        let event = StripeEventBuilder::new()
            .entitlements("cus_4", &["other"])
            .previous_entitlements(&["other", "plex"])
            .build();

        assert!(matches!(
            interpreter().interpret(&event).unwrap(),
            EntitlementDecision::NoOp { .. }
        ));
    }

    #[test]
    fn empty_both_sides_is_noop() {
        let event = StripeEventBuilder::new().entitlements("cus_5", &[]).build();

        let decision = interpreter().interpret(&event).unwrap();

        assert!(matches!(decision, EntitlementDecision::NoOp { .. }));
        assert_eq!(decision.customer_id(), "cus_5");
    }

    #[test]
    fn other_event_types_are_ignored() {
        let event = StripeEventBuilder::new()
            .event_type("invoice.payment_succeeded")
            .build();

        assert!(matches!(
            interpreter().interpret(&event),
            Err(WebhookError::Ignored(_))
        ));
    }

    #[test]
    fn malformed_summary_is_parse_error() {
        let event = StripeEventBuilder::new()
            .object(serde_json::json!({ "entitlements": { "data": [] } }))
            .build();

        assert!(matches!(
            interpreter().interpret(&event),
            Err(WebhookError::ParseError(_))
        ));
    }

    // ══════════════════════════════════════════════════════════════
    // Identity resolution
    // ══════════════════════════════════════════════════════════════

    fn grant() -> EntitlementDecision {
        EntitlementDecision::Grant {
            customer_id: "cus_1".into(),
        }
    }

    fn revoke() -> EntitlementDecision {
        EntitlementDecision::Revoke {
            customer_id: "cus_1".into(),
        }
    }

    #[test]
    fn grant_prefers_plex_email_metadata() {
        let customer = BillingCustomer::new("cus_1")
            .with_email("billing@example.com")
            .with_metadata("plex_email", "plex@example.com");

        let request = interpreter()
            .resolve(&grant(), "evt_1", &customer)
            .unwrap()
            .unwrap();

        assert_eq!(request.action, AccessAction::Grant);
        assert_eq!(
            request.subject,
            AccessSubject::Email("plex@example.com".into())
        );
        assert_eq!(
            request.source,
            AccessSource::BillingEntitlement {
                event_id: "evt_1".into(),
                customer_id: "cus_1".into()
            }
        );
    }

    #[test]
    fn grant_falls_back_to_primary_email() {
        let customer = BillingCustomer::new("cus_1").with_email("billing@example.com");

        let request = interpreter()
            .resolve(&grant(), "evt_1", &customer)
            .unwrap()
            .unwrap();

        assert_eq!(
            request.subject,
            AccessSubject::Email("billing@example.com".into())
        );
    }

    #[test]
    fn grant_without_any_email_fails() {
        let customer = BillingCustomer::new("cus_1");

        let err = interpreter().resolve(&grant(), "evt_1", &customer).unwrap_err();

        assert!(matches!(err, AccessError::IdentityResolution { ref customer_id, .. } if customer_id == "cus_1"));
    }

    #[test]
    fn revoke_uses_plex_user_id_metadata() {
        let customer = BillingCustomer::new("cus_1")
            .with_email("billing@example.com")
            .with_metadata("plex_user_id", "12345");

        let request = interpreter()
            .resolve(&revoke(), "evt_2", &customer)
            .unwrap()
            .unwrap();

        assert_eq!(request.action, AccessAction::Revoke);
        assert_eq!(
            request.subject,
            AccessSubject::UserId(PlexUserId::new(12345).unwrap())
        );
    }

    #[test]
    fn revoke_without_user_id_fails_even_with_email() {
        let customer = BillingCustomer::new("cus_1").with_email("billing@example.com");

        let err = interpreter().resolve(&revoke(), "evt_2", &customer).unwrap_err();

        assert!(matches!(err, AccessError::IdentityResolution { .. }));
    }

    #[test]
    fn revoke_with_garbage_user_id_fails() {
        let customer = BillingCustomer::new("cus_1").with_metadata("plex_user_id", "abc");

        assert!(interpreter().resolve(&revoke(), "evt_2", &customer).is_err());
    }

    #[test]
    fn noop_resolves_to_none() {
        let decision = EntitlementDecision::NoOp {
            customer_id: "cus_1".into(),
            reason: "x".into(),
        };

        let result = interpreter()
            .resolve(&decision, "evt_3", &BillingCustomer::new("cus_1"))
            .unwrap();

        assert!(result.is_none());
    }
}
