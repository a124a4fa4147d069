//! Subscription record
//!
//! A user's paid access to a named service over a contiguous run of months.

use serde::Serialize;
use uuid::Uuid;

use super::{DomainError, Month};

/// A persisted subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    /// Cost per calendar month in the smallest currency unit.
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: Month,
    /// `None` while the subscription is still running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Month>,
}

impl Subscription {
    /// Check the write-side invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_fields(&self.service_name, i64::from(self.price), self.start_date, self.end_date)
    }

    /// Whether the subscription has no known end.
    pub fn is_open_ended(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Subscription as submitted for creation. The id is assigned by the
/// repository when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub id: Option<Uuid>,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: Month,
    pub end_date: Option<Month>,
}

impl NewSubscription {
    /// Build a validated subscription payload.
    ///
    /// # Errors
    /// - `DomainError::EmptyServiceName` if the name is blank
    /// - `DomainError::PriceOutOfRange` if the price is negative or exceeds `i32::MAX`
    /// - `DomainError::EndBeforeStart` if `end_date` precedes `start_date`
    pub fn new(
        service_name: impl Into<String>,
        price: i64,
        user_id: Uuid,
        start_date: Month,
        end_date: Option<Month>,
    ) -> Result<Self, DomainError> {
        let service_name = service_name.into();
        validate_fields(&service_name, price, start_date, end_date)?;

        Ok(Self {
            id: None,
            service_name,
            price: i32::try_from(price).map_err(|_| DomainError::PriceOutOfRange(price))?,
            user_id,
            start_date,
            end_date,
        })
    }

    /// Use a caller-chosen id instead of a generated one.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach the final id.
    pub fn into_subscription(self, id: Uuid) -> Subscription {
        Subscription {
            id,
            service_name: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

fn validate_fields(
    service_name: &str,
    price: i64,
    start_date: Month,
    end_date: Option<Month>,
) -> Result<(), DomainError> {
    if service_name.trim().is_empty() {
        return Err(DomainError::EmptyServiceName);
    }

    if !(0..=i64::from(i32::MAX)).contains(&price) {
        return Err(DomainError::PriceOutOfRange(price));
    }

    if let Some(end) = end_date {
        if end < start_date {
            return Err(DomainError::EndBeforeStart {
                start: start_date,
                end,
            });
        }
    }

    Ok(())
}
