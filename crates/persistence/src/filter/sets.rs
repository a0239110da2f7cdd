//! Per-resource filter sets.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::debug;

use super::fragment::SqlFragment;
use super::name_or_id::NameOrIdFilter;
use super::name_search::{DualColumnSearch, ObligatoryNameSearch, TermSearch};
use super::path::{FieldPath, Hop};
use super::synonym::{GENDERS, SynonymFilter};
use super::temporal::{FROM_YEAR, TemporalRangeFilter, UNTIL_YEAR};
use crate::error::StorageResult;
use crate::types::ResourceType;

/// Raw query parameters of one request.
pub type QueryParams = HashMap<String, String>;

/// The comparison a [`FilterSpec`] performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    /// Validity intervals overlapping `from_year` / `until_year`.
    YearRange(TemporalRangeFilter),
    /// Related entity by id or name.
    NameOrId(NameOrIdFilter),
    /// Categorical value given as a code or canonical value.
    Synonym(SynonymFilter),
    /// Substring search on either of two columns.
    Search(DualColumnSearch),
    /// Substring search with a minimum input length.
    ObligatorySearch(ObligatoryNameSearch),
    /// Every whitespace-separated term must match.
    Terms(TermSearch),
}

/// A named filter bound to one query parameter.
///
/// Year ranges are bound to both `from_year` and `until_year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    name: &'static str,
    kind: FilterKind,
}

impl FilterSpec {
    /// Creates a filter reading parameter `name`.
    pub fn new(name: &'static str, kind: FilterKind) -> Self {
        Self { name, kind }
    }

    /// The year range filter, reading `from_year` and `until_year`.
    pub fn year_range(filter: TemporalRangeFilter) -> Self {
        Self::new(FROM_YEAR, FilterKind::YearRange(filter))
    }

    /// The query parameters this filter reads.
    pub fn parameters(&self) -> Vec<&'static str> {
        match self.kind {
            FilterKind::YearRange(_) => vec![FROM_YEAR, UNTIL_YEAR],
            _ => vec![self.name],
        }
    }

    /// Builds this filter's predicate, or `None` when its parameters are
    /// absent or empty.
    pub fn build(&self, params: &QueryParams) -> StorageResult<Option<SqlFragment>> {
        if let FilterKind::YearRange(filter) = &self.kind {
            let window = TemporalRangeFilter::parse_window(params)?;
            return Ok(filter.build(&window));
        }

        let value = params.get(self.name).map(|v| v.trim()).unwrap_or_default();
        if value.is_empty() {
            return Ok(None);
        }
        let fragment = match &self.kind {
            FilterKind::NameOrId(filter) => filter.build(value),
            FilterKind::Synonym(filter) => filter.build(self.name, value)?,
            FilterKind::Search(filter) => filter.build(value),
            FilterKind::ObligatorySearch(filter) => filter.build(self.name, value)?,
            FilterKind::Terms(filter) => filter.build(value),
            FilterKind::YearRange(_) => None,
        };
        Ok(fragment)
    }
}

/// The filters one resource type recognises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    resource: ResourceType,
    filters: Vec<FilterSpec>,
}

static SETS: LazyLock<Vec<FilterSet>> = LazyLock::new(|| {
    ResourceType::ALL
        .into_iter()
        .map(FilterSet::declare)
        .collect()
});

impl FilterSet {
    /// Returns the shared filter set for `resource`.
    pub fn for_resource(resource: ResourceType) -> &'static FilterSet {
        let index = ResourceType::ALL
            .iter()
            .position(|r| *r == resource)
            .unwrap_or_default();
        &SETS[index]
    }

    /// The resource type this set filters.
    pub fn resource(&self) -> ResourceType {
        self.resource
    }

    /// The filters in declaration order.
    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }

    /// Every query parameter the set recognises.
    pub fn parameters(&self) -> Vec<&'static str> {
        self.filters.iter().flat_map(FilterSpec::parameters).collect()
    }

    /// ANDs the predicates of every supplied filter.
    ///
    /// Unrecognised parameters are ignored. Returns an empty fragment when
    /// nothing applies.
    pub fn apply(&self, params: &QueryParams) -> StorageResult<SqlFragment> {
        let mut predicate = SqlFragment::default();
        for filter in &self.filters {
            if let Some(fragment) = filter.build(params)? {
                predicate = predicate.and(fragment);
            }
        }
        debug!(
            resource = %self.resource,
            params = predicate.params.len(),
            "Applied filter set"
        );
        Ok(predicate)
    }

    fn declare(resource: ResourceType) -> Self {
        let filters = match resource {
            ResourceType::School => {
                let mut filters = school_filters(&[], "id", ["type", "field", "language", "gender"]);
                filters.push(FilterSpec::year_range(TemporalRangeFilter::through([
                    Hop::new("id", "school_name", "school_id"),
                ])));
                filters.push(FilterSpec::new(
                    "search",
                    FilterKind::Terms(TermSearch::new(FieldPath::through(
                        [Hop::new("id", "school_name", "school_id")],
                        "value",
                    ))),
                ));
                filters
            }
            ResourceType::Principal => {
                let employerships = [Hop::new("id", "employership", "principal_id")];
                let mut filters = vec![
                    FilterSpec::new(
                        "search",
                        FilterKind::ObligatorySearch(ObligatoryNameSearch::new(
                            DualColumnSearch::new(
                                FieldPath::column("first_name"),
                                FieldPath::column("surname"),
                            ),
                        )),
                    ),
                    FilterSpec::year_range(TemporalRangeFilter::through(employerships)),
                ];
                filters.extend(school_filters(&employerships, "school_id", SCHOOL_PARAMS));
                filters
            }
            ResourceType::Employership => {
                let principal = [Hop::new("principal_id", "principal", "id")];
                let mut filters = vec![
                    FilterSpec::new(
                        "search",
                        FilterKind::ObligatorySearch(ObligatoryNameSearch::new(
                            DualColumnSearch::new(
                                FieldPath::through(principal, "first_name"),
                                FieldPath::through(principal, "surname"),
                            ),
                        )),
                    ),
                    FilterSpec::year_range(TemporalRangeFilter::own()),
                ];
                filters.extend(school_filters(&[], "school_id", SCHOOL_PARAMS));
                filters
            }
            ResourceType::SchoolBuilding => {
                let mut filters = vec![
                    street_search(&[Hop::new("building_id", "building_address", "building_id")]),
                    FilterSpec::year_range(TemporalRangeFilter::own()),
                ];
                filters.extend(school_filters(&[], "school_id", SCHOOL_PARAMS));
                filters
            }
            ResourceType::Building => {
                let school_buildings = [Hop::new("id", "school_building", "building_id")];
                let mut filters = vec![
                    street_search(&[Hop::new("id", "building_address", "building_id")]),
                    FilterSpec::year_range(TemporalRangeFilter::through(school_buildings)),
                ];
                filters.extend(school_filters(&school_buildings, "school_id", SCHOOL_PARAMS));
                filters
            }
            ResourceType::Language | ResourceType::SchoolType | ResourceType::SchoolField => {
                Vec::new()
            }
        };
        Self { resource, filters }
    }
}

const SCHOOL_PARAMS: [&str; 4] = [
    "school_type",
    "school_field",
    "school_language",
    "school_gender",
];

/// Type, field, language and gender filters for the school reached through
/// `to_school`, whose key is held in `school_key`.
fn school_filters(to_school: &[Hop], school_key: &'static str, names: [&'static str; 4]) -> Vec<FilterSpec> {
    let [type_param, field_param, language_param, gender_param] = names;
    let path = |hops: &[Hop], column| {
        let mut all = to_school.to_vec();
        all.extend_from_slice(hops);
        FieldPath::through(all, column)
    };

    vec![
        FilterSpec::new(
            type_param,
            FilterKind::NameOrId(NameOrIdFilter::new(path(
                &[
                    Hop::new(school_key, "school_type", "school_id"),
                    Hop::new("type_id", "school_type_name", "id"),
                ],
                "name",
            ))),
        ),
        FilterSpec::new(
            field_param,
            FilterKind::NameOrId(NameOrIdFilter::new(path(
                &[
                    Hop::new(school_key, "school_field", "school_id"),
                    Hop::new("field_id", "school_field_name", "id"),
                ],
                "description",
            ))),
        ),
        FilterSpec::new(
            language_param,
            FilterKind::NameOrId(NameOrIdFilter::new(path(
                &[
                    Hop::new(school_key, "school_language", "school_id"),
                    Hop::new("language_id", "language", "id"),
                ],
                "name",
            ))),
        ),
        FilterSpec::new(
            gender_param,
            FilterKind::Synonym(SynonymFilter::new(
                path(&[Hop::new(school_key, "school_gender", "school_id")], "gender"),
                &GENDERS,
            )),
        ),
    ]
}

/// Finnish or Swedish street name of any of the building's addresses.
fn street_search(to_building_address: &[Hop]) -> FilterSpec {
    let mut hops = to_building_address.to_vec();
    hops.push(Hop::new("address_id", "address", "id"));
    FilterSpec::new(
        "search",
        FilterKind::Search(DualColumnSearch::new(
            FieldPath::through(hops.clone(), "street_name_fi"),
            FieldPath::through(hops, "street_name_sv"),
        )),
    )
}

/// Compiles the query parameters of one request into a predicate over
/// `resource`'s base table.
pub fn apply_filters(resource: ResourceType, params: &QueryParams) -> StorageResult<SqlFragment> {
    FilterSet::for_resource(resource).apply(params)
}
