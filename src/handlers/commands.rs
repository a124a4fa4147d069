//! Command definitions
//!
//! Commands represent intentions to change the system state; queries ask for
//! derived data without changing it.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{CostFilter, DomainError, Month, NewSubscription, QueryWindow, Subscription};

// =========================================================================
// CreateSubscriptionCommand
// =========================================================================

/// Command to register a new subscription
#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub service_name: String,
    /// Monthly price; validated against the stored range
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: Month,
    pub end_date: Option<Month>,
}

impl CreateSubscriptionCommand {
    pub fn new(service_name: String, price: i64, user_id: Uuid, start_date: Month) -> Self {
        Self {
            service_name,
            price,
            user_id,
            start_date,
            end_date: None,
        }
    }

    pub fn with_end_date(mut self, end_date: Month) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Validate into a storable payload
    pub fn into_new_subscription(self) -> Result<NewSubscription, DomainError> {
        NewSubscription::new(
            self.service_name,
            self.price,
            self.user_id,
            self.start_date,
            self.end_date,
        )
    }
}

// =========================================================================
// UpdateSubscriptionCommand
// =========================================================================

/// Command to replace every field of an existing subscription
#[derive(Debug, Clone)]
pub struct UpdateSubscriptionCommand {
    pub id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: Month,
    pub end_date: Option<Month>,
}

impl UpdateSubscriptionCommand {
    pub fn new(id: Uuid, service_name: String, price: i64, user_id: Uuid, start_date: Month) -> Self {
        Self {
            id,
            service_name,
            price,
            user_id,
            start_date,
            end_date: None,
        }
    }

    pub fn with_end_date(mut self, end_date: Month) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Validate into the replacement record; the id is kept as given
    pub fn into_subscription(self) -> Result<Subscription, DomainError> {
        let id = self.id;
        NewSubscription::new(
            self.service_name,
            self.price,
            self.user_id,
            self.start_date,
            self.end_date,
        )
        .map(|valid| valid.into_subscription(id))
    }
}

// =========================================================================
// AggregateCostQuery
// =========================================================================

/// Query for the total cost billed inside a month window
#[derive(Debug, Clone)]
pub struct AggregateCostQuery {
    pub from: Month,
    pub to: Month,
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

impl AggregateCostQuery {
    pub fn new(from: Month, to: Month) -> Self {
        Self {
            from,
            to,
            user_id: None,
            service_name: None,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_service_name(mut self, service_name: String) -> Self {
        self.service_name = Some(service_name);
        self
    }

    /// Split into the validated window and the exact-match filter
    pub fn into_parts(self) -> Result<(QueryWindow, CostFilter), DomainError> {
        let window = QueryWindow::new(self.from, self.to)?;
        let filter = CostFilter {
            user_id: self.user_id,
            service_name: self.service_name,
        };
        Ok((window, filter))
    }
}

/// Result of a cost aggregation
#[derive(Debug, Clone, Serialize)]
pub struct AggregateCostResult {
    pub total: i64,
    /// Number of subscriptions with at least one month inside the window
    pub subscriptions: usize,
    pub window: QueryWindow,
}
