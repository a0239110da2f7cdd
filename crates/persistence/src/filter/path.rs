//! Relational paths from a resource's base table to a filtered column.

use super::fragment::SqlFragment;

/// One foreign-key step between tables.
///
/// Renders as `parent_column IN (SELECT column FROM table WHERE <inner>)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    /// Column on the current table holding the key.
    pub parent_column: &'static str,
    /// Table the hop enters.
    pub table: &'static str,
    /// Column on `table` matched against `parent_column`.
    pub column: &'static str,
}

impl Hop {
    /// Creates a new hop.
    pub const fn new(parent_column: &'static str, table: &'static str, column: &'static str) -> Self {
        Self {
            parent_column,
            table,
            column,
        }
    }

    fn render(&self, inner: SqlFragment) -> SqlFragment {
        SqlFragment::with_params(
            format!(
                "{} IN (SELECT {} FROM {} WHERE {})",
                self.parent_column, self.column, self.table, inner.sql
            ),
            inner.params,
        )
    }
}

/// A terminal column reached through zero or more hops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    hops: Vec<Hop>,
    column: &'static str,
}

impl FieldPath {
    /// A column on the base table itself.
    pub fn column(column: &'static str) -> Self {
        Self {
            hops: Vec::new(),
            column,
        }
    }

    /// A column reached through `hops`.
    pub fn through(hops: impl Into<Vec<Hop>>, column: &'static str) -> Self {
        Self {
            hops: hops.into(),
            column,
        }
    }

    /// The hops leading to the leaf table.
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// The terminal column.
    pub fn terminal(&self) -> &'static str {
        self.column
    }

    /// Returns the same path ending at a different column of the leaf table.
    pub fn with_column(&self, column: &'static str) -> Self {
        Self {
            hops: self.hops.clone(),
            column,
        }
    }

    /// Nests a condition on the leaf table through every hop.
    ///
    /// The result is a condition on the base table.
    pub fn wrap(&self, condition: SqlFragment) -> SqlFragment {
        self.hops
            .iter()
            .rev()
            .fold(condition, |inner, hop| hop.render(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SqlParam;

    #[test]
    fn test_direct_column_wraps_to_itself() {
        let path = FieldPath::column("surname");
        let cond = SqlFragment::with_params("surname = ?", vec![SqlParam::text("x")]);
        assert_eq!(path.wrap(cond.clone()), cond);
    }

    #[test]
    fn test_two_hops_nest_outermost_first() {
        let path = FieldPath::through(
            [
                Hop::new("id", "school_type", "school_id"),
                Hop::new("type_id", "school_type_name", "id"),
            ],
            "name",
        );
        let cond = SqlFragment::with_params("name = ?", vec![SqlParam::text("lyseo")]);
        let wrapped = path.wrap(cond);
        assert_eq!(
            wrapped.sql,
            "id IN (SELECT school_id FROM school_type WHERE \
             type_id IN (SELECT id FROM school_type_name WHERE name = ?))"
        );
        assert_eq!(wrapped.params, vec![SqlParam::text("lyseo")]);
    }

    #[test]
    fn test_with_column_leaves_original_untouched() {
        let path = FieldPath::through([Hop::new("language_id", "language", "id")], "name");
        let by_id = path.with_column("id");
        assert_eq!(by_id.terminal(), "id");
        assert_eq!(path.terminal(), "name");
        assert_eq!(by_id.hops(), path.hops());
    }
}
