//! In-memory repository
//!
//! `HashMap` behind a `tokio::sync::RwLock`. Writers are serialized by the
//! write lock; a candidate scan holds one read guard for its whole duration.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::aggregation::is_candidate;
use crate::domain::{CostFilter, ListFilter, NewSubscription, QueryWindow, Subscription};

use super::{StoreError, StoreResult, SubscriptionRepository};

#[derive(Debug, Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<HashMap<Uuid, Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored subscriptions
    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subscriptions.read().await.is_empty()
    }
}

fn sort_for_listing(subscriptions: &mut [Subscription]) {
    subscriptions.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.service_name.cmp(&b.service_name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn create(&self, subscription: NewSubscription) -> StoreResult<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;

        let id = subscription.id.unwrap_or_else(Uuid::new_v4);
        if subscriptions.contains_key(&id) {
            return Err(StoreError::Conflict(id));
        }

        let created = subscription.into_subscription(id);
        subscriptions.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Subscription> {
        self.subscriptions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, subscription: Subscription) -> StoreResult<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;

        let stored = subscriptions
            .get_mut(&subscription.id)
            .ok_or(StoreError::NotFound(subscription.id))?;
        *stored = subscription.clone();
        Ok(subscription)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.subscriptions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, filter: &ListFilter) -> StoreResult<Vec<Subscription>> {
        let mut matching: Vec<Subscription> = self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();

        sort_for_listing(&mut matching);
        Ok(matching)
    }

    async fn candidates_for_window(
        &self,
        window: &QueryWindow,
        filter: &CostFilter,
    ) -> StoreResult<Vec<Subscription>> {
        let snapshot = self.subscriptions.read().await;

        Ok(snapshot
            .values()
            .filter(|s| is_candidate(s, window, filter))
            .cloned()
            .collect())
    }
}
