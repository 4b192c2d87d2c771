//! Mock billing provider for testing.
//!
//! Supports pre-configured customers, error injection and call tracking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::billing::BillingCustomer;
use crate::ports::{BillingError, BillingProvider};

/// Mock billing provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockBillingProvider::new();
/// mock.add_customer(BillingCustomer::new("cus_1").with_email("a@example.com"));
/// mock.set_error(BillingError::network("timeout"));
/// ```
#[derive(Default, Clone)]
pub struct MockBillingProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    customers: HashMap<String, BillingCustomer>,
    /// Returned by every call while set.
    error: Option<BillingError>,
    lookups: Vec<String>,
}

impl MockBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builder form of [`add_customer`](Self::add_customer).
    pub fn with_customer(self, customer: BillingCustomer) -> Self {
        self.add_customer(customer);
        self
    }

    pub fn add_customer(&self, customer: BillingCustomer) {
        self.state().customers.insert(customer.id.clone(), customer);
    }

    pub fn set_error(&self, error: BillingError) {
        self.state().error = Some(error);
    }

    pub fn clear_error(&self) {
        self.state().error = None;
    }

    /// Customer ids looked up so far, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.state().lookups.clone()
    }
}

#[async_trait]
impl BillingProvider for MockBillingProvider {
    async fn get_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<BillingCustomer>, BillingError> {
        let mut state = self.state();
        state.lookups.push(customer_id.to_string());
        if let Some(error) = state.error.clone() {
            return Err(error);
        }
        Ok(state.customers.get(customer_id).cloned())
    }
}
