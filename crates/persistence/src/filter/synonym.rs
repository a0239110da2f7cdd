//! Categorical filters with short-code synonyms.

use super::fragment::{SqlFragment, SqlParam};
use super::lookup::Lookup;
use super::path::FieldPath;
use crate::error::ValidationError;

/// A fixed mapping from short codes to canonical stored values.
#[derive(Debug, PartialEq, Eq)]
pub struct SynonymMap {
    entries: &'static [(&'static str, &'static str)],
}

/// School gender codes.
pub static GENDERS: SynonymMap = SynonymMap {
    entries: &[
        ("m", "poikakoulu"),
        ("f", "tyttökoulu"),
        ("c", "tyttö- ja poikakoulu"),
    ],
};

impl SynonymMap {
    /// The accepted short codes.
    pub fn codes(&self) -> Vec<String> {
        self.entries.iter().map(|(code, _)| code.to_string()).collect()
    }

    /// Resolves a code or canonical value, ignoring case.
    pub fn resolve(&self, input: &str) -> Option<&'static str> {
        let folded = input.to_lowercase();
        self.entries
            .iter()
            .find(|(code, canonical)| *code == folded || *canonical == folded)
            .map(|(_, canonical)| *canonical)
    }
}

/// Matches a categorical column against a code or its canonical value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymFilter {
    path: FieldPath,
    map: &'static SynonymMap,
}

impl SynonymFilter {
    /// Creates a filter over `path` using `map`.
    pub fn new(path: FieldPath, map: &'static SynonymMap) -> Self {
        Self { path, map }
    }

    /// Builds the predicate. Empty input yields no predicate; unknown input
    /// fails naming `parameter` and the accepted codes.
    pub fn build(&self, parameter: &str, value: &str) -> Result<Option<SqlFragment>, ValidationError> {
        if value.is_empty() {
            return Ok(None);
        }
        let canonical = self
            .map
            .resolve(value)
            .ok_or_else(|| ValidationError::InvalidFilterValue {
                parameter: parameter.to_string(),
                accepted: self.map.codes(),
            })?;
        let condition = Lookup::IExact.build(self.path.terminal(), SqlParam::text(canonical));
        Ok(Some(self.path.wrap(condition)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Hop;

    fn gender_filter() -> SynonymFilter {
        SynonymFilter::new(
            FieldPath::through([Hop::new("id", "school_gender", "school_id")], "gender"),
            &GENDERS,
        )
    }

    #[test]
    fn test_codes_and_canonical_values_resolve_alike() {
        let filter = gender_filter();
        let by_code = filter.build("gender", "f").unwrap().unwrap();
        let by_value = filter.build("gender", "Tyttökoulu").unwrap().unwrap();
        assert_eq!(by_code, by_value);
        assert_eq!(by_code.params, vec![SqlParam::text("tyttökoulu")]);
    }

    #[test]
    fn test_stored_value_compared_case_insensitively() {
        let predicate = gender_filter().build("gender", "m").unwrap().unwrap();
        assert!(predicate.sql.contains("casefold(gender) = ?"));
        assert_eq!(predicate.params, vec![SqlParam::text("poikakoulu")]);
    }

    #[test]
    fn test_upper_case_code() {
        assert_eq!(GENDERS.resolve("C"), Some("tyttö- ja poikakoulu"));
    }

    #[test]
    fn test_empty_is_noop() {
        assert_eq!(gender_filter().build("gender", "").unwrap(), None);
    }

    #[test]
    fn test_unknown_value_lists_codes() {
        let err = gender_filter().build("school_gender", "x").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidFilterValue {
                parameter: "school_gender".to_string(),
                accepted: vec!["m".to_string(), "f".to_string(), "c".to_string()],
            }
        );
    }
}
