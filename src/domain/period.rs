//! Period arithmetic
//!
//! Pure calendar-month math used to clip a subscription's active period to a
//! query window. Nothing here fails: an empty overlap is an ordinary outcome
//! and counts as zero months.

use serde::Serialize;

use super::{DomainError, Month};

/// Number of calendar months from `start` through `end`, both included.
///
/// Returns `0` when `end` precedes `start`.
pub fn months_inclusive(start: Month, end: Month) -> i64 {
    if end < start {
        return 0;
    }
    let years = i64::from(end.year()) - i64::from(start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    years * 12 + months + 1
}

/// The later of two months.
pub fn later_of(a: Month, b: Month) -> Month {
    a.max(b)
}

/// The earlier of two months.
pub fn earlier_of(a: Month, b: Month) -> Month {
    a.min(b)
}

/// Inclusive `[from, to]` range of months an aggregation is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryWindow {
    from: Month,
    to: Month,
}

impl QueryWindow {
    /// Create a window. `from` must not be after `to`.
    pub fn new(from: Month, to: Month) -> Result<Self, DomainError> {
        if from > to {
            return Err(DomainError::InvertedWindow { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> Month {
        self.from
    }

    pub fn to(&self) -> Month {
        self.to
    }

    /// Length of the window in months (always at least 1).
    pub fn months(&self) -> i64 {
        months_inclusive(self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    fn m(year: i32, month: u32) -> Month {
        Month::new(year, month).unwrap()
    }

    #[derive(Debug, Clone, Copy)]
    struct AnyMonth(Month);

    impl Arbitrary for AnyMonth {
        fn arbitrary(g: &mut Gen) -> Self {
            let year = 1900 + i32::from(u16::arbitrary(g) % 300);
            let month = 1 + u32::from(u8::arbitrary(g) % 12);
            AnyMonth(m(year, month))
        }
    }

    #[test]
    fn test_same_month_counts_once() {
        assert_eq!(months_inclusive(m(2025, 7), m(2025, 7)), 1);
    }

    #[test]
    fn test_months_inclusive_within_year() {
        assert_eq!(months_inclusive(m(2025, 7), m(2025, 9)), 3);
    }

    #[test]
    fn test_months_inclusive_across_years() {
        assert_eq!(months_inclusive(m(2024, 11), m(2025, 2)), 4);
        assert_eq!(months_inclusive(m(2020, 1), m(2029, 12)), 120);
    }

    #[test]
    fn test_reversed_arguments_yield_zero() {
        assert_eq!(months_inclusive(m(2025, 9), m(2025, 7)), 0);
        assert_eq!(months_inclusive(m(2026, 1), m(2025, 12)), 0);
    }

    #[test]
    fn test_later_and_earlier_of() {
        let a = m(2025, 6);
        let b = m(2025, 7);
        assert_eq!(later_of(a, b), b);
        assert_eq!(later_of(b, a), b);
        assert_eq!(earlier_of(a, b), a);
        assert_eq!(earlier_of(b, a), a);
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        let err = QueryWindow::new(m(2025, 9), m(2025, 7)).unwrap_err();
        assert!(matches!(err, DomainError::InvertedWindow { .. }));
    }

    #[test]
    fn test_window_months() {
        let window = QueryWindow::new(m(2025, 7), m(2025, 9)).unwrap();
        assert_eq!(window.months(), 3);
        assert_eq!(window.from(), m(2025, 7));
        assert_eq!(window.to(), m(2025, 9));
    }

    #[quickcheck]
    fn prop_ordered_pair_counts_at_least_one(a: AnyMonth, b: AnyMonth) -> bool {
        let (start, end) = if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) };
        months_inclusive(start, end) >= 1
    }

    #[quickcheck]
    fn prop_reversed_pair_counts_zero(a: AnyMonth, b: AnyMonth) -> bool {
        if a.0 == b.0 {
            return months_inclusive(a.0, b.0) == 1;
        }
        let (start, end) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        months_inclusive(end, start) == 0
    }
}
