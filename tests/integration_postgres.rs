//! Integration tests for the PostgreSQL repository
//!
//! Require a running database: `DATABASE_URL=... cargo test -- --ignored`

use subscription_tracker::domain::{CostFilter, ListFilter, Month, NewSubscription, QueryWindow};
use subscription_tracker::store::{PgSubscriptionRepository, StoreError, SubscriptionRepository};
use uuid::Uuid;

mod common;

fn m(year: i32, month: u32) -> Month {
    Month::new(year, month).unwrap()
}

fn new_sub(service_name: &str, user_id: Uuid, price: i64, start: Month, end: Option<Month>) -> NewSubscription {
    NewSubscription::new(service_name.to_string(), price, user_id, start, end).unwrap()
}

#[tokio::test]
#[ignore]
async fn test_crud_round_trip() {
    let pool = common::setup_test_db().await;
    let repository = PgSubscriptionRepository::new(pool);
    let user = Uuid::new_v4();

    let created = repository
        .create(new_sub("Yandex Plus", user, 400, m(2025, 7), None))
        .await
        .unwrap();
    assert_eq!(created.start_date, m(2025, 7));
    assert!(created.end_date.is_none());

    let fetched = repository.get(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let mut replacement = created.clone();
    replacement.price = 500;
    replacement.end_date = Some(m(2025, 12));
    let updated = repository.update(replacement.clone()).await.unwrap();
    assert_eq!(updated, replacement);

    repository.delete(created.id).await.unwrap();
    let err = repository.get(created.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        repository.delete(created.id).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_id_conflicts() {
    let pool = common::setup_test_db().await;
    let repository = PgSubscriptionRepository::new(pool);
    let id = Uuid::new_v4();
    let user = Uuid::new_v4();

    repository
        .create(new_sub("S", user, 1, m(2025, 1), None).with_id(id))
        .await
        .unwrap();
    let err = repository
        .create(new_sub("S", user, 1, m(2025, 1), None).with_id(id))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Conflict(conflict) if conflict == id));
}

#[tokio::test]
#[ignore]
async fn test_list_filters() {
    let pool = common::setup_test_db().await;
    let repository = PgSubscriptionRepository::new(pool);
    let user = Uuid::new_v4();

    repository.create(new_sub("Yandex Plus", user, 400, m(2025, 7), None)).await.unwrap();
    repository.create(new_sub("Netflix", user, 999, m(2025, 1), None)).await.unwrap();
    repository.create(new_sub("100% Music", user, 10, m(2025, 2), None)).await.unwrap();

    let mine = repository.list(&ListFilter::new().with_user(user)).await.unwrap();
    assert_eq!(mine.len(), 3);
    assert_eq!(mine[0].service_name, "Netflix");

    let yandex = repository
        .list(&ListFilter::new().with_user(user).with_service_name("YANDEX"))
        .await
        .unwrap();
    assert_eq!(yandex.len(), 1);

    // LIKE metacharacters match literally
    let percent = repository
        .list(&ListFilter::new().with_user(user).with_service_name("%"))
        .await
        .unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].service_name, "100% Music");
}

#[tokio::test]
#[ignore]
async fn test_candidates_for_window() {
    let pool = common::setup_test_db().await;
    let repository = PgSubscriptionRepository::new(pool);
    let user = Uuid::new_v4();

    repository.create(new_sub("S1", user, 100, m(2025, 7), None)).await.unwrap();
    repository.create(new_sub("S2", user, 200, m(2025, 6), Some(m(2025, 8)))).await.unwrap();
    repository.create(new_sub("Old", user, 50, m(2024, 1), Some(m(2024, 12)))).await.unwrap();
    repository.create(new_sub("Future", user, 50, m(2026, 1), None)).await.unwrap();

    let window = QueryWindow::new(m(2025, 7), m(2025, 9)).unwrap();

    let candidates = repository
        .candidates_for_window(&window, &CostFilter::new().with_user(user))
        .await
        .unwrap();
    let mut names: Vec<_> = candidates.iter().map(|s| s.service_name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["S1", "S2"]);

    let total = subscription_tracker::aggregation::aggregate(
        &candidates,
        &window,
        &CostFilter::new().with_user(user),
    );
    assert_eq!(total, 700);

    let exact = repository
        .candidates_for_window(&window, &CostFilter::new().with_user(user).with_service_name("s1"))
        .await
        .unwrap();
    assert!(exact.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_candidates_include_mid_month_rows() {
    let pool = common::setup_test_db().await;
    let repository = PgSubscriptionRepository::new(pool.clone());
    let user = Uuid::new_v4();

    // Written by another client, not normalized to the 1st
    sqlx::query(
        r#"
        INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date)
        VALUES ($1, 'Late', 250, $2, '2025-09-15', NULL)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user)
    .execute(&pool)
    .await
    .unwrap();

    let window = QueryWindow::new(m(2025, 7), m(2025, 9)).unwrap();
    let filter = CostFilter::new().with_user(user);
    let candidates = repository.candidates_for_window(&window, &filter).await.unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].start_date, m(2025, 9));
    assert_eq!(
        subscription_tracker::aggregation::aggregate(&candidates, &window, &filter),
        250
    );
}
