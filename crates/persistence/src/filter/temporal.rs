//! Temporal range filtering over validity intervals.

use std::collections::HashMap;

use super::fragment::{SqlFragment, SqlParam};
use super::path::{FieldPath, Hop};
use crate::error::{StorageResult, ValidationError};
use crate::types::YearWindow;

/// Query parameter holding the window's lower bound.
pub const FROM_YEAR: &str = "from_year";

/// Query parameter holding the window's upper bound.
pub const UNTIL_YEAR: &str = "until_year";

/// Matches entities with at least one validity interval overlapping the
/// requested year window.
///
/// Both bounds are checked against the same interval row, so an entity
/// whose only intervals are `1900-1910` and `1950-1960` does not match the
/// window `1920-1930`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalRangeFilter {
    interval: FieldPath,
}

impl TemporalRangeFilter {
    /// Intervals stored on the base table itself.
    pub fn own() -> Self {
        Self {
            interval: FieldPath::column("begin_year"),
        }
    }

    /// Intervals stored on the table reached through `hops`.
    pub fn through(hops: impl Into<Vec<Hop>>) -> Self {
        Self {
            interval: FieldPath::through(hops, "begin_year"),
        }
    }

    /// Reads the window from `from_year` and `until_year`.
    pub fn parse_window(params: &HashMap<String, String>) -> StorageResult<YearWindow> {
        Ok(YearWindow::new(
            parse_year(params, FROM_YEAR)?,
            parse_year(params, UNTIL_YEAR)?,
        ))
    }

    /// Builds the overlap predicate. An unbounded window yields no predicate.
    pub fn build(&self, window: &YearWindow) -> Option<SqlFragment> {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        if let Some(from) = window.from_year {
            clauses.push("(end_year IS NULL OR end_year >= ?)");
            params.push(SqlParam::integer(from));
        }
        if let Some(until) = window.until_year {
            clauses.push("(begin_year IS NULL OR begin_year <= ?)");
            params.push(SqlParam::integer(until));
        }
        if clauses.is_empty() {
            return None;
        }
        let condition = SqlFragment::with_params(clauses.join(" AND "), params);
        Some(self.interval.wrap(condition))
    }
}

fn parse_year(params: &HashMap<String, String>, name: &str) -> StorageResult<Option<i64>> {
    let Some(raw) = params.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(name, raw));
    }
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| invalid(name, raw))
}

fn invalid(name: &str, raw: &str) -> crate::error::StorageError {
    ValidationError::InvalidNumber {
        parameter: name.to_string(),
        value: raw.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unbounded_window_is_noop() {
        let filter = TemporalRangeFilter::own();
        let window = TemporalRangeFilter::parse_window(&params(&[])).unwrap();
        assert!(window.is_unbounded());
        assert!(filter.build(&window).is_none());
    }

    #[test]
    fn test_both_bounds_share_one_interval_row() {
        let filter = TemporalRangeFilter::through([Hop::new("id", "school_name", "school_id")]);
        let frag = filter.build(&YearWindow::new(Some(1920), Some(1930))).unwrap();
        assert_eq!(
            frag.sql,
            "id IN (SELECT school_id FROM school_name WHERE \
             (end_year IS NULL OR end_year >= ?) AND (begin_year IS NULL OR begin_year <= ?))"
        );
        assert_eq!(
            frag.params,
            vec![SqlParam::integer(1920), SqlParam::integer(1930)]
        );
    }

    #[test]
    fn test_lower_bound_only() {
        let frag = TemporalRangeFilter::own()
            .build(&YearWindow::new(Some(1950), None))
            .unwrap();
        assert_eq!(frag.sql, "(end_year IS NULL OR end_year >= ?)");
        assert_eq!(frag.params, vec![SqlParam::integer(1950)]);
    }

    #[test]
    fn test_blank_values_are_absent() {
        let window =
            TemporalRangeFilter::parse_window(&params(&[("from_year", " "), ("until_year", "")]))
                .unwrap();
        assert!(window.is_unbounded());
    }

    #[test]
    fn test_non_numeric_year_is_rejected() {
        for bad in ["19x0", "-5", "1950.5"] {
            let err = TemporalRangeFilter::parse_window(&params(&[("until_year", bad)]))
                .unwrap_err();
            assert!(err.is_validation(), "{bad} should be rejected");
        }
    }
}
