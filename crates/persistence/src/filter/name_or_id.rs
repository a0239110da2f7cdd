//! Filters accepting either an identifier or a name.

use super::fragment::{SqlFragment, SqlParam};
use super::lookup::Lookup;
use super::path::FieldPath;

/// What a name-or-id value was dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// All-digit input, compared with the leaf table's `id`.
    Identifier(String),
    /// Anything else, compared case-insensitively with the name column.
    Name(String),
}

impl Target {
    /// Classifies a raw value.
    pub fn classify(value: &str) -> Self {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            Target::Identifier(value.to_string())
        } else {
            Target::Name(value.to_string())
        }
    }
}

/// Matches a related entity by id or by name.
///
/// `?language=1` and `?language=suomi` both reach the `language` table; the
/// first compares its `id`, the second its `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameOrIdFilter {
    path: FieldPath,
}

impl NameOrIdFilter {
    /// Creates a filter whose path ends at the name column.
    pub fn new(path: FieldPath) -> Self {
        Self { path }
    }

    /// The configured name path.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Builds the predicate for `value`. Empty input yields no predicate.
    pub fn build(&self, value: &str) -> Option<SqlFragment> {
        if value.is_empty() {
            return None;
        }
        let (path, condition) = match Target::classify(value) {
            Target::Identifier(digits) => {
                let path = self.path.with_column("id");
                // Out-of-range digits still target the id column and match nothing.
                let param = digits
                    .parse::<i64>()
                    .map(SqlParam::integer)
                    .unwrap_or(SqlParam::Text(digits));
                let condition = Lookup::Exact.build(path.terminal(), param);
                (path, condition)
            }
            Target::Name(name) => {
                let condition = Lookup::IExact.build(self.path.terminal(), SqlParam::Text(name));
                (self.path.clone(), condition)
            }
        };
        Some(path.wrap(condition))
    }
}
