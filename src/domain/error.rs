//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::Month;

/// Domain-specific errors
///
/// These errors represent invalid subscription data or query parameters.
/// They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Text is not a valid `MM-YYYY` month
    #[error("Invalid month: {0:?}, expected MM-YYYY")]
    InvalidMonth(String),

    /// Service name is empty or whitespace
    #[error("Service name must not be empty")]
    EmptyServiceName,

    /// Price is negative or does not fit the stored range
    #[error("Price out of range: {0}")]
    PriceOutOfRange(i64),

    /// Subscription ends before it starts
    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: Month, end: Month },

    /// Query window starts after it ends
    #[error("Query window start {from} is after its end {to}")]
    InvertedWindow { from: Month, to: Month },
}

impl DomainError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMonth(_) => "invalid_month",
            Self::EmptyServiceName => "empty_service_name",
            Self::PriceOutOfRange(_) => "invalid_price",
            Self::EndBeforeStart { .. } => "end_before_start",
            Self::InvertedWindow { .. } => "inverted_window",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_before_start_message() {
        let err = DomainError::EndBeforeStart {
            start: Month::new(2025, 7).unwrap(),
            end: Month::new(2025, 6).unwrap(),
        };

        assert_eq!(err.code(), "end_before_start");
        assert!(err.to_string().contains("06-2025"));
        assert!(err.to_string().contains("07-2025"));
    }

    #[test]
    fn test_invalid_month_message() {
        let err = DomainError::InvalidMonth("2025-07".to_string());
        assert_eq!(err.code(), "invalid_month");
        assert!(err.to_string().contains("MM-YYYY"));
    }
}
