//! Store module
//!
//! Persistence layer for subscriptions.
//! The `SubscriptionRepository` trait is the only way handlers touch storage;
//! the PostgreSQL implementation backs the server, the in-memory one backs tests.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CostFilter, ListFilter, NewSubscription, QueryWindow, Subscription};

pub use error::StoreError;
pub use memory::InMemorySubscriptionRepository;
pub use postgres::PgSubscriptionRepository;

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage contract for subscriptions
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a new subscription, assigning an id when none was given.
    async fn create(&self, subscription: NewSubscription) -> StoreResult<Subscription>;

    /// Fetch one subscription. `StoreError::NotFound` when absent.
    async fn get(&self, id: Uuid) -> StoreResult<Subscription>;

    /// Replace every field except the id. `StoreError::NotFound` when absent.
    async fn update(&self, subscription: Subscription) -> StoreResult<Subscription>;

    /// Remove a subscription. `StoreError::NotFound` when absent.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Subscriptions matching the filter, ordered by start date, service name, id.
    async fn list(&self, filter: &ListFilter) -> StoreResult<Vec<Subscription>>;

    /// Subscriptions overlapping the window and passing the exact-match filter,
    /// read from a single consistent snapshot.
    async fn candidates_for_window(
        &self,
        window: &QueryWindow,
        filter: &CostFilter,
    ) -> StoreResult<Vec<Subscription>>;
}
