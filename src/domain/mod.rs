//! Domain module
//!
//! Core domain types and period arithmetic.

pub mod context;
pub mod error;
pub mod filter;
pub mod month;
pub mod period;
pub mod subscription;

pub use context::RequestContext;
pub use error::DomainError;
pub use filter::{CostFilter, ListFilter};
pub use month::Month;
pub use period::{earlier_of, later_of, months_inclusive, QueryWindow};
pub use subscription::{NewSubscription, Subscription};
