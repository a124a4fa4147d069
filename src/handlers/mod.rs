//! Command Handlers module
//!
//! Handlers that validate commands and coordinate the repository and the
//! aggregation engine.

mod commands;
mod cost_handler;
mod subscription_handler;


pub use commands::*;
pub use cost_handler::AggregateCostHandler;
pub use subscription_handler::SubscriptionHandler;
