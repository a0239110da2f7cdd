//! Validity intervals and the year windows they are queried with.

use serde::{Deserialize, Serialize};

/// The begin/end years during which a relationship fact held.
///
/// A missing end year means the fact still holds; a missing begin year means
/// it has held since before recorded history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidityInterval {
    /// First year the fact held.
    pub begin_year: Option<i64>,
    /// Last year the fact held.
    pub end_year: Option<i64>,
}

impl ValidityInterval {
    /// Creates a new interval.
    pub fn new(begin_year: Option<i64>, end_year: Option<i64>) -> Self {
        Self {
            begin_year,
            end_year,
        }
    }

    /// Returns true if this interval overlaps the window.
    pub fn overlaps(&self, window: &YearWindow) -> bool {
        let after_from = match (self.end_year, window.from_year) {
            (Some(end), Some(from)) => end >= from,
            _ => true,
        };
        let before_until = match (self.begin_year, window.until_year) {
            (Some(begin), Some(until)) => begin <= until,
            _ => true,
        };
        after_from && before_until
    }
}

/// A requested `[from_year, until_year]` window. Missing bounds are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearWindow {
    /// Lower bound (inclusive).
    pub from_year: Option<i64>,
    /// Upper bound (inclusive).
    pub until_year: Option<i64>,
}

impl YearWindow {
    /// Creates a new window.
    pub fn new(from_year: Option<i64>, until_year: Option<i64>) -> Self {
        Self {
            from_year,
            until_year,
        }
    }

    /// Returns true if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.from_year.is_none() && self.until_year.is_none()
    }

    /// Returns true if any of the intervals overlaps this window.
    pub fn matches_any<'a, I>(&self, intervals: I) -> bool
    where
        I: IntoIterator<Item = &'a ValidityInterval>,
    {
        intervals.into_iter().any(|i| i.overlaps(self))
    }
}
