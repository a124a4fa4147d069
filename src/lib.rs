//! Subscription Tracker Library
//!
//! Re-exports modules for integration testing and external use.

pub mod aggregation;
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod store;

pub use api::{build_app, AppState};
pub use config::Config;
pub use error::AppError;
pub use domain::{DomainError, Month, NewSubscription, QueryWindow, RequestContext, Subscription};
pub use store::{InMemorySubscriptionRepository, PgSubscriptionRepository, SubscriptionRepository};
