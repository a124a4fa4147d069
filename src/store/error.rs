//! Store Errors
//!
//! Error types for subscription repository operations.

use uuid::Uuid;

/// Errors that can occur in a subscription repository
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No subscription with this id
    #[error("Subscription not found: {0}")]
    NotFound(Uuid),

    /// A subscription with this id already exists
    #[error("Subscription already exists: {0}")]
    Conflict(Uuid),

    /// The storage layer rejected the record (CHECK / NOT NULL constraint)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Check if this error means the record is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Map a write failure, recognizing constraint violations reported by the database.
    pub(crate) fn from_write(err: sqlx::Error, id: Uuid) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(id);
            }
            if db_err.is_check_violation() || db_err.is_foreign_key_violation() {
                return StoreError::ConstraintViolation(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}
