//! Cost aggregation engine
//!
//! Sums what a set of subscriptions bills inside a query window. Every month
//! a subscription touches inside the window is billed in full.

use crate::domain::{earlier_of, later_of, months_inclusive, CostFilter, QueryWindow, Subscription};

/// Whether a subscription's active period overlaps the window and it passes
/// the exact-match filter.
pub fn is_candidate(subscription: &Subscription, window: &QueryWindow, filter: &CostFilter) -> bool {
    let ends_in_time = subscription
        .end_date
        .map_or(true, |end| end >= window.from());
    let starts_in_time = subscription.start_date <= window.to();

    ends_in_time && starts_in_time && filter.matches(subscription)
}

/// Months of the subscription that fall inside the window.
///
/// An inverted or non-overlapping period yields `0`.
pub fn overlap_months(subscription: &Subscription, window: &QueryWindow) -> i64 {
    let start = later_of(subscription.start_date, window.from());
    let end = earlier_of(subscription.end_date.unwrap_or(window.to()), window.to());
    months_inclusive(start, end)
}

/// What one subscription bills inside the window.
pub fn contribution(subscription: &Subscription, window: &QueryWindow) -> i64 {
    let months = overlap_months(subscription, window);
    if months <= 0 {
        return 0;
    }

    if subscription.price < 0 {
        tracing::warn!(
            subscription_id = %subscription.id,
            price = subscription.price,
            "Skipping subscription with negative price"
        );
        return 0;
    }

    months.saturating_mul(i64::from(subscription.price))
}

/// Total cost billed inside `window` by the subscriptions passing `filter`.
///
/// Records are re-checked against the candidate predicate, so the result is
/// the same whether or not the caller pre-filtered them. All contributions are
/// non-negative and the sum saturates, so iteration order never matters.
pub fn aggregate<'a, I>(records: I, window: &QueryWindow, filter: &CostFilter) -> i64
where
    I: IntoIterator<Item = &'a Subscription>,
{
    records
        .into_iter()
        .filter(|subscription| is_candidate(subscription, window, filter))
        .map(|subscription| contribution(subscription, window))
        .fold(0_i64, i64::saturating_add)
}
