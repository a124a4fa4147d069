//! Month type
//!
//! Month-granularity calendar date. Day-of-month carries no meaning for
//! subscription billing, so every value is normalized to the first day of
//! its month and compares by (year, month).

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// A calendar month, e.g. July 2025.
///
/// # Invariants
/// - The wrapped date is always the 1st of its month
/// - Ordering is chronological by (year, month)
///
/// # Example
/// ```
/// use subscription_tracker::domain::Month;
///
/// let month: Month = "07-2025".parse().unwrap();
/// assert_eq!(month.year(), 2025);
/// assert_eq!(month.month(), 7);
/// assert_eq!(month.to_string(), "07-2025");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(NaiveDate);

impl Month {
    /// Create a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidMonth(format!("{:02}-{:04}", month, year)))
    }

    /// Month containing the given date. The day is discarded.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First calendar day of the month (the persisted form).
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

/// Parses the `MM-YYYY` form (two-digit month, four-digit year).
impl FromStr for Month {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidMonth(s.to_string());

        let (month, year) = s.split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(invalid());
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Month {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}
