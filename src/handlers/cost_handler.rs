//! Cost Aggregation Handler
//!
//! Fetches the candidate subscriptions for a window in one repository call and
//! sums what they bill inside it.

use std::sync::Arc;

use crate::aggregation::{aggregate, is_candidate, overlap_months};
use crate::domain::RequestContext;
use crate::error::AppError;
use crate::store::SubscriptionRepository;

use super::{AggregateCostQuery, AggregateCostResult};

/// Handler for cost aggregation queries
pub struct AggregateCostHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl AggregateCostHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    /// Execute the aggregation query
    ///
    /// Storage failures are returned as-is; retrying is left to the caller.
    pub async fn execute(
        &self,
        query: AggregateCostQuery,
        context: &RequestContext,
    ) -> Result<AggregateCostResult, AppError> {
        let (window, filter) = query.into_parts()?;

        let candidates = self
            .repository
            .candidates_for_window(&window, &filter)
            .await?;

        let total = aggregate(&candidates, &window, &filter);
        let billed = candidates
            .iter()
            .filter(|s| is_candidate(s, &window, &filter) && overlap_months(s, &window) > 0)
            .count();

        tracing::debug!(
            request_id = context.request_id_or_dash(),
            from = %window.from(),
            to = %window.to(),
            user_id = ?filter.user_id,
            service_name = ?filter.service_name,
            candidates = candidates.len(),
            billed,
            total,
            "Cost aggregated"
        );

        Ok(AggregateCostResult {
            total,
            subscriptions: billed,
            window,
        })
    }
}
