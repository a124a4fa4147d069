//! Subscription Handler
//!
//! Create, read, replace, delete and list subscriptions.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{ListFilter, RequestContext, Subscription};
use crate::error::AppError;
use crate::store::SubscriptionRepository;

use super::{CreateSubscriptionCommand, UpdateSubscriptionCommand};

/// Handler for subscription lifecycle operations
pub struct SubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    /// Validate and persist a new subscription
    pub async fn create(
        &self,
        command: CreateSubscriptionCommand,
        context: &RequestContext,
    ) -> Result<Subscription, AppError> {
        let new_subscription = command.into_new_subscription()?;
        let created = self.repository.create(new_subscription).await?;

        tracing::info!(
            request_id = context.request_id_or_dash(),
            subscription_id = %created.id,
            user_id = %created.user_id,
            service_name = %created.service_name,
            "Subscription created"
        );

        Ok(created)
    }

    /// Fetch one subscription
    pub async fn get(&self, id: Uuid) -> Result<Subscription, AppError> {
        Ok(self.repository.get(id).await?)
    }

    /// Replace all fields of an existing subscription
    pub async fn update(
        &self,
        command: UpdateSubscriptionCommand,
        context: &RequestContext,
    ) -> Result<Subscription, AppError> {
        let replacement = command.into_subscription()?;
        let updated = self.repository.update(replacement).await?;

        tracing::info!(
            request_id = context.request_id_or_dash(),
            subscription_id = %updated.id,
            "Subscription updated"
        );

        Ok(updated)
    }

    /// Remove a subscription
    pub async fn delete(&self, id: Uuid, context: &RequestContext) -> Result<(), AppError> {
        self.repository.delete(id).await?;

        tracing::info!(
            request_id = context.request_id_or_dash(),
            subscription_id = %id,
            "Subscription deleted"
        );

        Ok(())
    }

    /// List subscriptions (exact user, substring service name)
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>, AppError> {
        Ok(self.repository.list(filter).await?)
    }
}
