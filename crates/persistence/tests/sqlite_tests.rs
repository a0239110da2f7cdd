//! SQLite backend integration tests.
//!
//! These tests run the filter sets and loaders against the sample register
//! in `data/sample.sql`.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use kore_persistence::backends::sqlite::SqliteBackend;
use kore_persistence::cache::{CacheStore, EntityDescriptor, MemoryCacheStore, cache_adapter};
use kore_persistence::core::SchoolStorage;
use kore_persistence::error::{StorageError, StorageResult, ValidationError};
use kore_persistence::filter::apply_filters;
use kore_persistence::types::{Pagination, ResourceType, ValidityInterval, YearWindow};

const SAMPLE: &str = include_str!("../../../data/sample.sql");

fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
        .execute_batch(SAMPLE)
        .expect("Failed to load sample data");
    backend
}

fn matching(
    backend: &SqliteBackend,
    resource: ResourceType,
    pairs: &[(&str, &str)],
) -> StorageResult<Vec<i64>> {
    let params: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let predicate = apply_filters(resource, &params)?;
    let page = backend.query_ids(resource, &predicate, Pagination::new(1, 100))?;
    Ok(page.items)
}

// ============================================================================
// Temporal Filter Tests
// ============================================================================

#[test]
fn test_open_ended_interval_never_excluded_by_upper_bound() {
    let backend = create_backend();

    // School 2 has been named "Norssin poikakoulu" since 1900 with no end.
    let ids = matching(&backend, ResourceType::School, &[("until_year", "1900")]).unwrap();
    assert!(ids.contains(&2));

    let ids = matching(&backend, ResourceType::School, &[("from_year", "2020")]).unwrap();
    assert_eq!(ids, vec![1, 2, 5, 6]);
}

#[test]
fn test_both_bounds_checked_against_same_interval() {
    let backend = create_backend();

    // School 5 was named 1900-1910 and again from 1970; neither overlaps 1920-1930.
    let ids = matching(
        &backend,
        ResourceType::School,
        &[("from_year", "1920"), ("until_year", "1930")],
    )
    .unwrap();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn test_null_begin_year_satisfies_upper_bound() {
    let backend = create_backend();
    let ids = matching(&backend, ResourceType::School, &[("until_year", "1800")]).unwrap();
    assert_eq!(ids, vec![4]);
}

/// Windows over the sample register's years, bounded on at least one side.
fn windows() -> Vec<YearWindow> {
    let years = [None, Some(1800), Some(1905), Some(1925), Some(1950), Some(1975), Some(2020)];
    years
        .iter()
        .flat_map(|from| years.iter().map(|until| YearWindow::new(*from, *until)))
        .filter(|window| !window.is_unbounded())
        .collect()
}

fn window_params(window: &YearWindow) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Some(from) = window.from_year {
        pairs.push(("from_year".to_string(), from.to_string()));
    }
    if let Some(until) = window.until_year {
        pairs.push(("until_year".to_string(), until.to_string()));
    }
    pairs
}

/// Checks the SQL year predicate of `resource` against the intervals each
/// entity was loaded with.
fn assert_year_filter_matches_intervals<F>(backend: &SqliteBackend, resource: ResourceType, intervals: F)
where
    F: Fn(i64) -> Vec<ValidityInterval>,
{
    let all = matching(backend, resource, &[]).unwrap();
    assert!(!all.is_empty());

    for window in windows() {
        let pairs = window_params(&window);
        let pairs: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let actual = matching(backend, resource, &pairs).unwrap();
        let expected: Vec<i64> = all
            .iter()
            .copied()
            .filter(|id| window.matches_any(&intervals(*id)))
            .collect();
        assert_eq!(actual, expected, "{resource} with {window:?}");
    }
}

#[test]
fn test_school_year_filter_agrees_with_name_intervals() {
    let backend = create_backend();
    assert_year_filter_matches_intervals(&backend, ResourceType::School, |id| {
        let school = backend.load_school(id).unwrap().unwrap();
        school.names.iter().map(|name| name.interval).collect()
    });
}

#[test]
fn test_principal_year_filter_agrees_with_employerships() {
    let backend = create_backend();
    assert_year_filter_matches_intervals(&backend, ResourceType::Principal, |id| {
        let principal = backend.load_principal(id).unwrap().unwrap();
        principal.employers.iter().map(|e| e.interval).collect()
    });
}

#[test]
fn test_employership_year_filter_agrees_with_own_interval() {
    let backend = create_backend();
    assert_year_filter_matches_intervals(&backend, ResourceType::Employership, |id| {
        vec![backend.load_employership(id).unwrap().unwrap().interval]
    });
}

#[test]
fn test_invalid_year_is_validation_error() {
    let backend = create_backend();
    let err = matching(&backend, ResourceType::School, &[("from_year", "1950s")]).unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::InvalidNumber { .. })
    ));
}

// ============================================================================
// Composite Filter Tests
// ============================================================================

#[test]
fn test_girls_schools_named_in_the_fifties() {
    let backend = create_backend();

    let ids = matching(
        &backend,
        ResourceType::School,
        &[("from_year", "1950"), ("until_year", "1960"), ("gender", "f")],
    )
    .unwrap();
    assert_eq!(ids, vec![1, 6]);

    let err = matching(
        &backend,
        ResourceType::School,
        &[("from_year", "1950"), ("until_year", "1960"), ("gender", "x")],
    )
    .unwrap_err();
    match err {
        StorageError::Validation(ValidationError::InvalidFilterValue { parameter, accepted }) => {
            assert_eq!(parameter, "gender");
            assert_eq!(accepted, vec!["m", "f", "c"]);
        }
        other => panic!("expected InvalidFilterValue, got {other:?}"),
    }
}

#[test]
fn test_gender_code_and_canonical_value_agree() {
    let backend = create_backend();
    let by_code = matching(&backend, ResourceType::School, &[("gender", "M")]).unwrap();
    let by_value = matching(&backend, ResourceType::School, &[("gender", "poikakoulu")]).unwrap();
    assert_eq!(by_code, vec![2]);
    assert_eq!(by_code, by_value);
}

#[test]
fn test_gender_matches_stored_value_in_any_case() {
    let backend = create_backend();
    backend
        .execute_batch(
            "INSERT INTO school (id, checked) VALUES (70, 0);
             INSERT INTO school_gender (id, school_id, gender) VALUES (70, 70, 'Tyttökoulu');",
        )
        .unwrap();

    let ids = matching(&backend, ResourceType::School, &[("gender", "f")]).unwrap();
    assert!(ids.contains(&70));
    let ids = matching(&backend, ResourceType::School, &[("gender", "m")]).unwrap();
    assert!(!ids.contains(&70));
}

#[test]
fn test_type_by_id_or_name() {
    let backend = create_backend();
    let by_id = matching(&backend, ResourceType::School, &[("type", "1")]).unwrap();
    let by_name = matching(&backend, ResourceType::School, &[("type", "LYSEO")]).unwrap();
    assert_eq!(by_id, vec![1, 3, 5]);
    assert_eq!(by_id, by_name);

    let ids = matching(&backend, ResourceType::School, &[("language", "2")]).unwrap();
    assert_eq!(ids, vec![3]);
    let ids = matching(&backend, ResourceType::School, &[("language", "Ruotsi")]).unwrap();
    assert_eq!(ids, vec![3]);
    let ids = matching(&backend, ResourceType::School, &[("field", "kauppa")]).unwrap();
    assert_eq!(ids, vec![4]);
}

#[test]
fn test_school_term_search() {
    let backend = create_backend();
    let ids = matching(&backend, ResourceType::School, &[("search", "TYTTÖ")]).unwrap();
    assert_eq!(ids, vec![1, 5, 6]);

    let ids = matching(&backend, ResourceType::School, &[("search", "helsingin tyttö")]).unwrap();
    assert_eq!(ids, vec![1]);
}

#[test]
fn test_principal_search_matches_either_column() {
    let backend = create_backend();

    // Surname only.
    let ids = matching(&backend, ResourceType::Principal, &[("search", "virtanen")]).unwrap();
    assert_eq!(ids, vec![1]);

    // First name only.
    let ids = matching(&backend, ResourceType::Principal, &[("search", "Gustav")]).unwrap();
    assert_eq!(ids, vec![2]);

    let ids = matching(&backend, ResourceType::Principal, &[("search", "zzzz")]).unwrap();
    assert!(ids.is_empty());
}

#[test]
fn test_principal_search_minimum_length() {
    let backend = create_backend();
    let err = matching(&backend, ResourceType::Principal, &[("search", "Eer")]).unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::InputTooShort { min_length: 4, .. })
    ));

    let ids = matching(&backend, ResourceType::Principal, &[("search", "Eero")]).unwrap();
    assert_eq!(ids, vec![5]);
}

#[test]
fn test_principal_filters_go_through_employerships() {
    let backend = create_backend();

    let ids = matching(&backend, ResourceType::Principal, &[("school_gender", "f")]).unwrap();
    assert_eq!(ids, vec![1, 2, 3]);

    let ids = matching(&backend, ResourceType::Principal, &[("from_year", "1965")]).unwrap();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_employership_filters() {
    let backend = create_backend();

    let ids = matching(
        &backend,
        ResourceType::Employership,
        &[("school_type", "kansakoulu")],
    )
    .unwrap();
    assert_eq!(ids, vec![3, 5]);

    let ids = matching(&backend, ResourceType::Employership, &[("search", "lind")]).unwrap();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_building_filters() {
    let backend = create_backend();

    let ids = matching(&backend, ResourceType::Building, &[("search", "bangatan")]).unwrap();
    assert_eq!(ids, vec![2]);

    let ids = matching(&backend, ResourceType::SchoolBuilding, &[("search", "ratakatu")]).unwrap();
    assert_eq!(ids, vec![2, 3]);

    let ids = matching(&backend, ResourceType::Building, &[("school_gender", "m")]).unwrap();
    assert_eq!(ids, vec![2]);

    let ids = matching(&backend, ResourceType::SchoolBuilding, &[("from_year", "1950")]).unwrap();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_unknown_parameters_match_everything() {
    let backend = create_backend();
    let ids = matching(&backend, ResourceType::Language, &[("search", "x")]).unwrap();
    assert_eq!(ids, vec![1, 2]);
}

// ============================================================================
// Pagination Tests
// ============================================================================

#[test]
fn test_query_ids_pages_in_id_order() {
    let backend = create_backend();
    let all = apply_filters(ResourceType::School, &HashMap::new()).unwrap();

    let page = backend
        .query_ids(ResourceType::School, &all, Pagination::new(2, 2))
        .unwrap();
    assert_eq!(page.items, vec![3, 4]);
    assert_eq!(page.total, 6);
    assert!(page.has_next());
    assert!(page.has_previous());

    let last = backend
        .query_ids(ResourceType::School, &all, Pagination::new(4, 2))
        .unwrap();
    assert!(last.items.is_empty());
}

// ============================================================================
// Loader Tests
// ============================================================================

#[test]
fn test_load_school_aggregate() {
    let backend = create_backend();
    let school = backend.load_school(1).unwrap().expect("school 1 exists");

    let names: Vec<&str> = school.names.iter().map(|n| n.value.as_str()).collect();
    assert_eq!(
        names,
        vec!["Helsingin Suomalainen Tyttökoulu", "Helsingin Tyttölyseo"]
    );
    assert_eq!(school.types[0].kind.name, "lyseo");
    assert_eq!(school.genders[0].gender, "tyttökoulu");
    assert_eq!(school.languages[0].language, "suomi");
    assert_eq!(school.buildings.len(), 1);
    assert!(school.buildings[0].photos[0].is_front);
    assert_eq!(school.buildings[0].building.neighborhood.as_deref(), Some("Kallio"));
    assert_eq!(school.principals[0].principal.surname.as_deref(), Some("Virtanen"));
    assert!(school.continuum_active.is_empty());
    assert_eq!(school.continuum_target[0].active_school.id, 4);
    assert_eq!(
        school.continuum_target[0].active_school.names[0].value,
        "Kallion yhteiskoulu"
    );
    assert!(school.checked);

    assert!(backend.load_school(99).unwrap().is_none());
}

#[test]
fn test_load_school_history_details() {
    let backend = create_backend();
    let school = backend.load_school(1).unwrap().unwrap();

    assert!(school.names[0].other_names.is_empty());
    assert_eq!(school.names[1].other_names[0].value, "Tyttis");
    assert_eq!(school.names[1].other_names[0].kind.as_deref(), Some("lempinimi"));

    let grades: Vec<i64> = school.grade_counts.iter().map(|g| g.number).collect();
    assert_eq!(grades, vec![5, 8]);

    // Owners come earliest first.
    assert_eq!(school.owners[0].owner.kind, "yhdistys");
    assert_eq!(school.owners[1].owner.name, "Helsingin kaupunki");
    assert_eq!(school.founders[0].founder.additional_info.as_deref(), Some("Perustettu 1879"));

    assert_eq!(
        school.archives[0].url.as_deref(),
        Some("https://www.hel.fi/kaupunginarkisto")
    );
    assert_eq!(school.archives[0].data_type.as_ref().unwrap().value, "oppilasmatrikkeli");
    assert_eq!(school.lifecycle_events[0].description, "perustaminen");
    assert_eq!(school.lifecycle_events[0].month, Some(9));

    assert_eq!(school.buildings[0].building.owners[0].interval.begin_year, Some(1890));

    let swedish = backend.load_school(3).unwrap().unwrap();
    assert_eq!(swedish.archives[0].url, None);
    assert_eq!(swedish.archives[0].data_type, None);
    assert!(swedish.owners.is_empty());
}

#[test]
fn test_load_school_building_dates() {
    let backend = create_backend();
    let school_building = backend.load_school_building(3).unwrap().unwrap();
    assert_eq!(school_building.dates.begin_day, Some(1));
    assert_eq!(school_building.dates.begin_month, Some(8));
    assert_eq!(school_building.dates.end_month, None);

    let school_building = backend.load_school_building(2).unwrap().unwrap();
    assert_eq!(school_building.dates.end_day, Some(31));
    assert_eq!(school_building.interval.end_year, Some(1940));
}

#[test]
fn test_load_principal_orders_employers_chronologically() {
    let backend = create_backend();

    let principal = backend.load_principal(2).unwrap().unwrap();
    let years: Vec<Option<i64>> = principal
        .employers
        .iter()
        .map(|e| e.interval.begin_year)
        .collect();
    assert_eq!(years, vec![Some(1925), Some(1960)]);

    let lonely = backend.load_principal(4).unwrap().unwrap();
    assert!(lonely.first_employership().is_none());
}

#[test]
fn test_load_other_entities() {
    let backend = create_backend();

    let building = backend.load_building(1).unwrap().unwrap();
    assert_eq!(building.addresses[0].street_name_sv.as_deref(), Some("Unionsgatan 2"));
    assert_eq!(backend.school_buildings_of(2).unwrap(), vec![2, 3]);

    let school_building = backend.load_school_building(3).unwrap().unwrap();
    assert_eq!(school_building.school_id, 2);
    assert_eq!(school_building.interval.end_year, None);

    let employership = backend.load_employership(3).unwrap().unwrap();
    assert_eq!(employership.principal.first_name.as_deref(), Some("Gustav"));

    assert_eq!(backend.load_language(2).unwrap().unwrap().name, "ruotsi");
    assert_eq!(backend.load_school_type(1).unwrap().unwrap().name, "lyseo");
    assert_eq!(
        backend.load_school_field(2).unwrap().unwrap().description,
        "yleissivistävä"
    );
    assert!(backend.load_language(9).unwrap().is_none());
    backend.ping().unwrap();
}

#[test]
fn test_file_backed_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kore.db");

    {
        let backend = SqliteBackend::open(&path).unwrap();
        backend.init_schema().unwrap();
        backend.execute_batch(SAMPLE).unwrap();
    }

    let reopened = SqliteBackend::open(&path).unwrap();
    reopened.init_schema().unwrap();
    assert!(!reopened.is_memory());
    assert_eq!(reopened.load_language(1).unwrap().unwrap().name, "suomi");
}

// ============================================================================
// Cache Tests
// ============================================================================

#[test]
fn test_cache_loads_once_then_hits() {
    let backend = Arc::new(create_backend());
    let loads = Arc::new(AtomicUsize::new(0));
    let builds = Arc::new(AtomicUsize::new(0));

    let descriptor = {
        let backend = backend.clone();
        let loads = loads.clone();
        let builds = builds.clone();
        EntityDescriptor::new(
            "school",
            move |id| {
                loads.fetch_add(1, Ordering::SeqCst);
                backend.load_school(id)
            },
            move |school: &kore_persistence::models::School| {
                builds.fetch_add(1, Ordering::SeqCst);
                json!({"id": school.id, "names": school.names.len()})
            },
        )
    };
    let store = Arc::new(MemoryCacheStore::new());
    let cache = cache_adapter(descriptor, store.clone());

    let first = cache.get(1).unwrap().unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(builds.load(Ordering::SeqCst), 1);

    let second = cache.get(1).unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(builds.load(Ordering::SeqCst), 1);

    let many = cache.get_many(&[6, 1, 42]).unwrap();
    assert_eq!(many, vec![json!({"id": 6, "names": 1}), first]);
    assert_eq!(loads.load(Ordering::SeqCst), 3);
    assert_eq!(store.len(), 2);
    assert_eq!(cache.stats().hits, 2);
}
