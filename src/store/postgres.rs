//! PostgreSQL repository
//!
//! sqlx-backed implementation of `SubscriptionRepository`. Months are stored
//! as `DATE` values on the first day of the month.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{CostFilter, ListFilter, Month, NewSubscription, QueryWindow, Subscription};

use super::{StoreError, StoreResult, SubscriptionRepository};

const SELECT_COLUMNS: &str =
    "SELECT id, service_name, price, user_id, start_date, end_date FROM subscriptions";

/// Row as stored in the `subscriptions` table
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    service_name: String,
    price: i32,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: row.id,
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id,
            start_date: Month::from_date(row.start_date),
            end_date: row.end_date.map(Month::from_date),
        }
    }
}

/// Escape `LIKE` metacharacters so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Date bounds matching every stored day of the window's months.
///
/// Rows written outside this service may carry a mid-month day; the upper
/// bound is the last day of `to` so those still count for that month.
fn window_bounds(window: &QueryWindow) -> (NaiveDate, NaiveDate) {
    (window.from().first_day(), window.to().last_day())
}

/// Subscription repository backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new repository with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(&self, subscription: NewSubscription) -> StoreResult<Subscription> {
        let id = subscription.id.unwrap_or_else(Uuid::new_v4);

        let row: SubscriptionRow = sqlx::query_as(
            r#"
            INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, service_name, price, user_id, start_date, end_date
            "#,
        )
        .bind(id)
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.user_id)
        .bind(subscription.start_date.first_day())
        .bind(subscription.end_date.map(|m| m.first_day()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, id))?;

        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> StoreResult<Subscription> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Subscription::from).ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, subscription: Subscription) -> StoreResult<Subscription> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            UPDATE subscriptions
            SET service_name = $1, price = $2, user_id = $3, start_date = $4, end_date = $5
            WHERE id = $6
            RETURNING id, service_name, price, user_id, start_date, end_date
            "#,
        )
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.user_id)
        .bind(subscription.start_date.first_day())
        .bind(subscription.end_date.map(|m| m.first_day()))
        .bind(subscription.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(e, subscription.id))?;

        row.map(Subscription::from)
            .ok_or(StoreError::NotFound(subscription.id))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let rows_affected = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn list(&self, filter: &ListFilter) -> StoreResult<Vec<Subscription>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_COLUMNS);
        query.push(" WHERE TRUE");

        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(ref needle) = filter.service_name {
            query
                .push(" AND service_name ILIKE ")
                .push_bind(format!("%{}%", escape_like(needle)));
        }
        query.push(" ORDER BY start_date, service_name, id");

        let rows = query.build_query_as::<SubscriptionRow>().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn candidates_for_window(
        &self,
        window: &QueryWindow,
        filter: &CostFilter,
    ) -> StoreResult<Vec<Subscription>> {
        // Read-only snapshot; dropping the transaction on any early return rolls it back.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let (lower, upper) = window_bounds(window);
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_COLUMNS);
        query
            .push(" WHERE (end_date IS NULL OR end_date >= ")
            .push_bind(lower)
            .push(") AND start_date <= ")
            .push_bind(upper);

        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(ref service_name) = filter.service_name {
            query.push(" AND service_name = ").push_bind(service_name.clone());
        }

        let rows = query.build_query_as::<SubscriptionRow>().fetch_all(&mut *tx).await?;

        // The rows are already read; a failed rollback only loses the connection
        if let Err(e) = tx.rollback().await {
            tracing::warn!(error = %e, "Rollback of read-only snapshot failed");
        }

        Ok(rows.into_iter().map(Subscription::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plus"), "plus");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\"), "c:\\\\");
    }

    #[test]
    fn test_window_bounds_cover_whole_months() {
        let window = QueryWindow::new(Month::new(2025, 7).unwrap(), Month::new(2025, 9).unwrap()).unwrap();
        let (lower, upper) = window_bounds(&window);

        assert_eq!(lower, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(upper, NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());

        // A mid-month start inside the last month is still in range
        assert!(NaiveDate::from_ymd_opt(2025, 9, 15).unwrap() <= upper);
    }

    #[test]
    fn test_row_conversion_normalizes_months() {
        let row = SubscriptionRow {
            id: Uuid::new_v4(),
            service_name: "Netflix".to_string(),
            price: 999,
            user_id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            end_date: None,
        };

        let sub = Subscription::from(row);
        assert_eq!(sub.start_date, Month::new(2025, 7).unwrap());
        assert!(sub.is_open_ended());
    }
}
