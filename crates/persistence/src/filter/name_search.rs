//! Substring search over name columns.

use super::fragment::{SqlFragment, SqlParam};
use super::lookup::Lookup;
use super::path::FieldPath;
use crate::error::ValidationError;

/// Minimum length of an obligatory search, in characters.
pub const MIN_SEARCH_LENGTH: usize = 4;

/// Case-insensitive substring match on either of two columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualColumnSearch {
    first: FieldPath,
    second: FieldPath,
}

impl DualColumnSearch {
    /// Creates a search over two paths.
    pub fn new(first: FieldPath, second: FieldPath) -> Self {
        Self { first, second }
    }

    /// Builds the predicate. Empty input yields no predicate.
    pub fn build(&self, value: &str) -> Option<SqlFragment> {
        if value.is_empty() {
            return None;
        }
        let side = |path: &FieldPath| {
            path.wrap(Lookup::IContains.build(path.terminal(), SqlParam::text(value)))
        };
        Some(side(&self.first).or(side(&self.second)))
    }
}

/// A [`DualColumnSearch`] refusing inputs shorter than a minimum length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObligatoryNameSearch {
    inner: DualColumnSearch,
    min_length: usize,
}

impl ObligatoryNameSearch {
    /// Creates a search requiring at least [`MIN_SEARCH_LENGTH`] characters.
    pub fn new(inner: DualColumnSearch) -> Self {
        Self {
            inner,
            min_length: MIN_SEARCH_LENGTH,
        }
    }

    /// Builds the predicate, or fails before building it when `value` is
    /// too short. Empty input yields no predicate.
    pub fn build(&self, parameter: &str, value: &str) -> Result<Option<SqlFragment>, ValidationError> {
        if value.is_empty() {
            return Ok(None);
        }
        if value.chars().count() < self.min_length {
            return Err(ValidationError::InputTooShort {
                parameter: parameter.to_string(),
                min_length: self.min_length,
            });
        }
        Ok(self.inner.build(value))
    }
}

/// Whitespace-separated terms, each required as a substring of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSearch {
    path: FieldPath,
}

impl TermSearch {
    /// Creates a term search over `path`.
    pub fn new(path: FieldPath) -> Self {
        Self { path }
    }

    /// Builds the predicate. Input without terms yields no predicate.
    pub fn build(&self, value: &str) -> Option<SqlFragment> {
        let terms = value.split_whitespace().map(|term| {
            self.path
                .wrap(Lookup::IContains.build(self.path.terminal(), SqlParam::text(term)))
        });
        let predicate = SqlFragment::all(terms);
        (!predicate.is_empty()).then_some(predicate)
    }
}
