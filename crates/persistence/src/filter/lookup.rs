//! Column comparisons.

use super::fragment::{SqlFragment, SqlParam};

/// A comparison between a column and one bound value.
///
/// Case-insensitive lookups rely on the `casefold` SQL function the SQLite
/// backend registers on every connection; the bound value is folded the same
/// way before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// `column = value`
    Exact,
    /// Case-insensitive equality.
    IExact,
    /// Case-insensitive substring match.
    IContains,
}

impl Lookup {
    /// Builds the condition for `column`.
    pub fn build(&self, column: &str, value: SqlParam) -> SqlFragment {
        match self {
            Lookup::Exact => SqlFragment::with_params(format!("{column} = ?"), vec![value]),
            Lookup::IExact => SqlFragment::with_params(
                format!("casefold({column}) = ?"),
                vec![fold(value)],
            ),
            Lookup::IContains => SqlFragment::with_params(
                format!("instr(casefold({column}), ?) > 0"),
                vec![fold(value)],
            ),
        }
    }
}

fn fold(value: SqlParam) -> SqlParam {
    match value {
        SqlParam::Text(s) => SqlParam::Text(s.to_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_keeps_value() {
        let frag = Lookup::Exact.build("id", SqlParam::integer(7));
        assert_eq!(frag.sql, "id = ?");
        assert_eq!(frag.params, vec![SqlParam::integer(7)]);
    }

    #[test]
    fn test_case_insensitive_lookups_fold_value() {
        let frag = Lookup::IExact.build("name", SqlParam::text("Ruotsi"));
        assert_eq!(frag.sql, "casefold(name) = ?");
        assert_eq!(frag.params, vec![SqlParam::text("ruotsi")]);

        let frag = Lookup::IContains.build("surname", SqlParam::text("ÅBERG"));
        assert_eq!(frag.sql, "instr(casefold(surname), ?) > 0");
        assert_eq!(frag.params, vec![SqlParam::text("åberg")]);
    }
}
