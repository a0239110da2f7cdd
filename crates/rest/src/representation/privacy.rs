//! The principal-name privacy rule.
//!
//! Names of principals whose employership began after the cutoff year, or
//! whose start year is unknown, are withheld.

use kore_persistence::models::PrincipalName;
use serde_json::{Value, json};

/// Decides when principal names may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePolicy {
    cutoff_year: i64,
}

impl Default for NamePolicy {
    fn default() -> Self {
        Self { cutoff_year: 1950 }
    }
}

impl NamePolicy {
    /// Creates a policy showing names of employerships that began in or
    /// before `cutoff_year`.
    pub fn new(cutoff_year: i64) -> Self {
        Self { cutoff_year }
    }

    /// The last year whose employerships show names.
    pub fn cutoff_year(&self) -> i64 {
        self.cutoff_year
    }

    /// Returns true if an employership beginning in `begin_year` may show
    /// the principal's name.
    pub fn allows(&self, begin_year: Option<i64>) -> bool {
        begin_year.is_some_and(|year| year <= self.cutoff_year)
    }

    /// Renders `surname` and `first_name`, nulled unless allowed.
    pub fn names(&self, name: &PrincipalName, begin_year: Option<i64>) -> (Value, Value) {
        if self.allows(begin_year) {
            (json!(name.surname), json!(name.first_name))
        } else {
            (Value::Null, Value::Null)
        }
    }
}
