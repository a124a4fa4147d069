//! Query filters
//!
//! Listing and cost aggregation filter on the same fields but match service
//! names differently: listing is a case-insensitive substring search, cost
//! aggregation requires the exact name.

use uuid::Uuid;

use super::Subscription;

/// Filter for listing subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Exact owner match
    pub user_id: Option<Uuid>,
    /// Case-insensitive substring of the service name
    pub service_name: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_service_name(mut self, needle: impl Into<String>) -> Self {
        self.service_name = Some(needle.into());
        self
    }

    pub fn matches(&self, subscription: &Subscription) -> bool {
        if let Some(user_id) = self.user_id {
            if subscription.user_id != user_id {
                return false;
            }
        }
        if let Some(ref needle) = self.service_name {
            let haystack = subscription.service_name.to_lowercase();
            if !haystack.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Filter for cost aggregation. Both fields match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

impl CostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    pub fn matches(&self, subscription: &Subscription) -> bool {
        self.user_id.map_or(true, |id| subscription.user_id == id)
            && self
                .service_name
                .as_deref()
                .map_or(true, |name| subscription.service_name == name)
    }
}
