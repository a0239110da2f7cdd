//! Parameterised SQL fragments.
//!
//! Fragments use anonymous `?` placeholders, so two fragments can be combined
//! by concatenating their SQL and their parameter lists in the same order.

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values, in placeholder order.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text parameter.
    Text(String),
    /// Integer parameter.
    Integer(i64),
}

impl SqlParam {
    /// Creates a text parameter.
    pub fn text(s: impl Into<String>) -> Self {
        SqlParam::Text(s.into())
    }

    /// Creates an integer parameter.
    pub fn integer(i: i64) -> Self {
        SqlParam::Integer(i)
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Combines with another fragment using AND.
    pub fn and(mut self, other: SqlFragment) -> Self {
        if !self.sql.is_empty() && !other.sql.is_empty() {
            self.sql = format!("({}) AND ({})", self.sql, other.sql);
        } else if !other.sql.is_empty() {
            self.sql = other.sql;
        }
        self.params.extend(other.params);
        self
    }

    /// Combines with another fragment using OR.
    pub fn or(mut self, other: SqlFragment) -> Self {
        if !self.sql.is_empty() && !other.sql.is_empty() {
            self.sql = format!("({}) OR ({})", self.sql, other.sql);
        } else if !other.sql.is_empty() {
            self.sql = other.sql;
        }
        self.params.extend(other.params);
        self
    }

    /// ANDs all fragments together. Returns an empty fragment for no input.
    pub fn all(fragments: impl IntoIterator<Item = SqlFragment>) -> Self {
        fragments
            .into_iter()
            .fold(SqlFragment::default(), SqlFragment::and)
    }

    /// ORs all fragments together. Returns an empty fragment for no input.
    pub fn any(fragments: impl IntoIterator<Item = SqlFragment>) -> Self {
        fragments
            .into_iter()
            .fold(SqlFragment::default(), SqlFragment::or)
    }

    /// Returns true if this fragment is empty (matches everything).
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Renders the fragment as a WHERE clause, or nothing if empty.
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.sql)
        }
    }
}

#[cfg(feature = "sqlite")]
impl rusqlite::ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        match self {
            SqlParam::Text(s) => s.to_sql(),
            SqlParam::Integer(i) => i.to_sql(),
        }
    }
}
