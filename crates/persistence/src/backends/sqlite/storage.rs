//! SchoolStorage implementation for SQLite.

use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::core::SchoolStorage;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::filter::SqlFragment;
use crate::models::{
    Address, ArchiveData, ArchiveDataType, Building, Continuum, DayPrecision, Employership,
    Founder, GradeCount, Language, LifecycleEvent, OtherName, OwnerFounder, Ownership, Photo,
    Principal, PrincipalName, School, SchoolBuilding, SchoolField, SchoolFieldName, SchoolGender,
    SchoolLanguage, SchoolName, SchoolSummary, SchoolType, SchoolTypeName,
};
use crate::types::{Page, Pagination, ResourceType, ValidityInterval};

use super::SqliteBackend;

/// Chronological order for interval rows; unknown begin years go last.
const CHRONOLOGICAL: &str = "ORDER BY begin_year IS NULL, begin_year, id";

fn query_error(e: rusqlite::Error) -> StorageError {
    StorageError::Backend(BackendError::QueryError {
        message: e.to_string(),
    })
}

impl SqliteBackend {
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> StorageResult<T> {
        let conn = self.get_connection()?;
        f(&conn).map_err(query_error)
    }
}

impl SchoolStorage for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn load_school(&self, id: i64) -> StorageResult<Option<School>> {
        self.with_connection(|conn| load_school(conn, id))
    }

    fn load_principal(&self, id: i64) -> StorageResult<Option<Principal>> {
        self.with_connection(|conn| load_principal(conn, id))
    }

    fn load_employership(&self, id: i64) -> StorageResult<Option<Employership>> {
        self.with_connection(|conn| {
            Ok(employerships(conn, "e.id = ?1", id)?.into_iter().next())
        })
    }

    fn load_building(&self, id: i64) -> StorageResult<Option<Building>> {
        self.with_connection(|conn| load_building(conn, id))
    }

    fn load_school_building(&self, id: i64) -> StorageResult<Option<SchoolBuilding>> {
        self.with_connection(|conn| {
            Ok(school_buildings(conn, "id = ?1", id)?.into_iter().next())
        })
    }

    fn load_language(&self, id: i64) -> StorageResult<Option<Language>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT id, name FROM language WHERE id = ?1",
                [id],
                |row| {
                    Ok(Language {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
        })
    }

    fn load_school_type(&self, id: i64) -> StorageResult<Option<SchoolTypeName>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT id, name, description FROM school_type_name WHERE id = ?1",
                [id],
                school_type_name,
            )
            .optional()
        })
    }

    fn load_school_field(&self, id: i64) -> StorageResult<Option<SchoolFieldName>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT id, description FROM school_field_name WHERE id = ?1",
                [id],
                school_field_name,
            )
            .optional()
        })
    }

    fn school_buildings_of(&self, building_id: i64) -> StorageResult<Vec<i64>> {
        self.with_connection(|conn| {
            let mut stmt =
                conn.prepare("SELECT id FROM school_building WHERE building_id = ?1 ORDER BY id")?;
            let ids = stmt
                .query_map([building_id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            Ok(ids)
        })
    }

    fn query_ids(
        &self,
        resource: ResourceType,
        predicate: &SqlFragment,
        pagination: Pagination,
    ) -> StorageResult<Page<i64>> {
        let table = resource.table();
        let where_clause = predicate.where_clause();
        let limit = i64::try_from(pagination.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);

        let (total, ids) = self.with_connection(|conn| {
            let filter_params: Vec<&dyn ToSql> =
                predicate.params.iter().map(|p| p as &dyn ToSql).collect();

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}{}", table, where_clause),
                filter_params.as_slice(),
                |row| row.get(0),
            )?;

            let mut page_params = filter_params.clone();
            page_params.push(&limit);
            page_params.push(&offset);
            let mut stmt = conn.prepare(&format!(
                "SELECT id FROM {}{} ORDER BY id LIMIT ? OFFSET ?",
                table, where_clause
            ))?;
            let ids = stmt
                .query_map(page_params.as_slice(), |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            Ok((total, ids))
        })?;

        debug!(
            resource = %resource,
            total,
            returned = ids.len(),
            page = pagination.page,
            "Queried ids"
        );
        Ok(Page::new(ids, u64::try_from(total).unwrap_or_default(), pagination))
    }

    fn ping(&self) -> StorageResult<()> {
        self.with_connection(|conn| conn.query_row("SELECT 1", [], |_| Ok(())))
    }
}

fn interval(row: &Row<'_>, begin: usize) -> rusqlite::Result<ValidityInterval> {
    Ok(ValidityInterval::new(row.get(begin)?, row.get(begin + 1)?))
}

fn school_type_name(row: &Row<'_>) -> rusqlite::Result<SchoolTypeName> {
    Ok(SchoolTypeName {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn school_field_name(row: &Row<'_>) -> rusqlite::Result<SchoolFieldName> {
    Ok(SchoolFieldName {
        id: row.get(0)?,
        description: row.get(1)?,
    })
}

fn load_school(conn: &Connection, id: i64) -> rusqlite::Result<Option<School>> {
    let row = conn
        .query_row(
            "SELECT special_features, wartime_school, nicknames, checked
             FROM school WHERE id = ?1",
            [id],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<bool>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, bool>(3)?,
                ))
            },
        )
        .optional()?;
    let Some((special_features, wartime_school, nicknames, checked)) = row else {
        return Ok(None);
    };

    Ok(Some(School {
        id,
        names: school_names(conn, id)?,
        languages: school_languages(conn, id)?,
        types: school_types(conn, id)?,
        fields: school_fields(conn, id)?,
        genders: school_genders(conn, id)?,
        grade_counts: grade_counts(conn, id)?,
        buildings: school_buildings(conn, "school_id = ?1", id)?,
        owners: ownerships(conn, "school_ownership", "school_id", id)?,
        founders: founders(conn, id)?,
        principals: employerships(conn, "e.school_id = ?1", id)?,
        archives: archives(conn, id)?,
        lifecycle_events: lifecycle_events(conn, id)?,
        continuum_active: continuum(conn, "active_school_id", id)?,
        continuum_target: continuum(conn, "target_school_id", id)?,
        special_features,
        wartime_school,
        nicknames,
        checked,
    }))
}

fn school_names(conn: &Connection, school_id: i64) -> rusqlite::Result<Vec<SchoolName>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, value, official, begin_year, end_year, reference
         FROM school_name WHERE school_id = ?1 {CHRONOLOGICAL}"
    ))?;
    let mut names = stmt
        .query_map([school_id], |row| {
            Ok(SchoolName {
                id: row.get(0)?,
                value: row.get(1)?,
                official: row.get(2)?,
                interval: interval(row, 3)?,
                reference: row.get(5)?,
                other_names: Vec::new(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for name in &mut names {
        name.other_names = other_names(conn, name.id)?;
    }
    Ok(names)
}

fn other_names(conn: &Connection, school_name_id: i64) -> rusqlite::Result<Vec<OtherName>> {
    let mut stmt = conn.prepare(
        "SELECT value, type FROM school_name_other WHERE school_name_id = ?1 ORDER BY id",
    )?;
    stmt.query_map([school_name_id], |row| {
        Ok(OtherName {
            value: row.get(0)?,
            kind: row.get(1)?,
        })
    })?
    .collect()
}

fn grade_counts(conn: &Connection, school_id: i64) -> rusqlite::Result<Vec<GradeCount>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, number, begin_year, end_year
         FROM school_grade_count WHERE school_id = ?1 {CHRONOLOGICAL}"
    ))?;
    stmt.query_map([school_id], |row| {
        Ok(GradeCount {
            id: row.get(0)?,
            number: row.get(1)?,
            interval: interval(row, 2)?,
        })
    })?
    .collect()
}

/// Owner columns of `owner_founder o` joined to `owner_founder_type t`, read
/// back by [`owner_founder`].
const OWNER_COLUMNS: &str = "o.id, o.name, o.additional_info, t.description";

fn owner_founder(row: &Row<'_>, at: usize) -> rusqlite::Result<OwnerFounder> {
    Ok(OwnerFounder {
        id: row.get(at)?,
        name: row.get(at + 1)?,
        additional_info: row.get(at + 2)?,
        kind: row.get(at + 3)?,
    })
}

/// Owners from `table`, whose owned entity is keyed by `column`.
fn ownerships(
    conn: &Connection,
    table: &str,
    column: &str,
    key: i64,
) -> rusqlite::Result<Vec<Ownership>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT x.id, x.begin_year, x.end_year, x.reference, {OWNER_COLUMNS}
         FROM {table} x
         JOIN owner_founder o ON o.id = x.owner_id
         JOIN owner_founder_type t ON t.id = o.type_id
         WHERE x.{column} = ?1
         ORDER BY x.begin_year IS NULL, x.begin_year, x.id"
    ))?;
    stmt.query_map([key], |row| {
        Ok(Ownership {
            id: row.get(0)?,
            interval: interval(row, 1)?,
            reference: row.get(3)?,
            owner: owner_founder(row, 4)?,
        })
    })?
    .collect()
}

fn founders(conn: &Connection, school_id: i64) -> rusqlite::Result<Vec<Founder>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT f.id, f.reference, {OWNER_COLUMNS}
         FROM school_founder f
         JOIN owner_founder o ON o.id = f.founder_id
         JOIN owner_founder_type t ON t.id = o.type_id
         WHERE f.school_id = ?1
         ORDER BY f.id"
    ))?;
    stmt.query_map([school_id], |row| {
        Ok(Founder {
            id: row.get(0)?,
            reference: row.get(1)?,
            founder: owner_founder(row, 2)?,
        })
    })?
    .collect()
}

fn archives(conn: &Connection, school_id: i64) -> rusqlite::Result<Vec<ArchiveData>> {
    let mut stmt = conn.prepare(
        "SELECT a.location, l.url, d.id, d.value, a.begin_year, a.end_year
         FROM archive_data a
         LEFT JOIN archive_data_link l ON l.id = a.link_id
         LEFT JOIN archive_data_type d ON d.id = a.data_type_id
         WHERE a.school_id = ?1
         ORDER BY a.begin_year IS NULL, a.begin_year, a.id",
    )?;
    stmt.query_map([school_id], |row| {
        let data_type = match (row.get::<_, Option<i64>>(2)?, row.get::<_, Option<String>>(3)?) {
            (Some(id), Some(value)) => Some(ArchiveDataType { id, value }),
            _ => None,
        };
        Ok(ArchiveData {
            location: row.get(0)?,
            url: row.get(1)?,
            data_type,
            interval: interval(row, 4)?,
        })
    })?
    .collect()
}

fn lifecycle_events(conn: &Connection, school_id: i64) -> rusqlite::Result<Vec<LifecycleEvent>> {
    let mut stmt = conn.prepare(
        "SELECT e.id, t.description, e.day, e.month, e.year, e.decisionmaker, e.additional_info
         FROM lifecycle_event e JOIN lifecycle_event_type t ON t.id = e.type_id
         WHERE e.school_id = ?1
         ORDER BY e.year IS NULL, e.year, e.month, e.day, e.id",
    )?;
    stmt.query_map([school_id], |row| {
        Ok(LifecycleEvent {
            id: row.get(0)?,
            description: row.get(1)?,
            day: row.get(2)?,
            month: row.get(3)?,
            year: row.get(4)?,
            decisionmaker: row.get(5)?,
            additional_info: row.get(6)?,
        })
    })?
    .collect()
}

fn school_languages(conn: &Connection, school_id: i64) -> rusqlite::Result<Vec<SchoolLanguage>> {
    let mut stmt = conn.prepare(
        "SELECT sl.id, l.name, sl.begin_year, sl.end_year
         FROM school_language sl JOIN language l ON l.id = sl.language_id
         WHERE sl.school_id = ?1
         ORDER BY sl.begin_year IS NULL, sl.begin_year, sl.id",
    )?;
    stmt.query_map([school_id], |row| {
        Ok(SchoolLanguage {
            id: row.get(0)?,
            language: row.get(1)?,
            interval: interval(row, 2)?,
        })
    })?
    .collect()
}

fn school_types(conn: &Connection, school_id: i64) -> rusqlite::Result<Vec<SchoolType>> {
    let mut stmt = conn.prepare(
        "SELECT st.id, t.id, t.name, t.description, st.begin_year, st.end_year
         FROM school_type st JOIN school_type_name t ON t.id = st.type_id
         WHERE st.school_id = ?1
         ORDER BY st.begin_year IS NULL, st.begin_year, st.id",
    )?;
    stmt.query_map([school_id], |row| {
        Ok(SchoolType {
            id: row.get(0)?,
            kind: SchoolTypeName {
                id: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
            },
            interval: interval(row, 4)?,
        })
    })?
    .collect()
}

fn school_fields(conn: &Connection, school_id: i64) -> rusqlite::Result<Vec<SchoolField>> {
    let mut stmt = conn.prepare(
        "SELECT sf.id, f.id, f.description, sf.begin_year, sf.end_year
         FROM school_field sf JOIN school_field_name f ON f.id = sf.field_id
         WHERE sf.school_id = ?1
         ORDER BY sf.begin_year IS NULL, sf.begin_year, sf.id",
    )?;
    stmt.query_map([school_id], |row| {
        Ok(SchoolField {
            id: row.get(0)?,
            field: SchoolFieldName {
                id: row.get(1)?,
                description: row.get(2)?,
            },
            interval: interval(row, 3)?,
        })
    })?
    .collect()
}

fn school_genders(conn: &Connection, school_id: i64) -> rusqlite::Result<Vec<SchoolGender>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, gender, begin_year, end_year
         FROM school_gender WHERE school_id = ?1 {CHRONOLOGICAL}"
    ))?;
    stmt.query_map([school_id], |row| {
        Ok(SchoolGender {
            id: row.get(0)?,
            gender: row.get(1)?,
            interval: interval(row, 2)?,
        })
    })?
    .collect()
}

/// Continuum events where `column` is the school.
fn continuum(conn: &Connection, column: &str, school_id: i64) -> rusqlite::Result<Vec<Continuum>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, active_school_id, target_school_id, description, day, month, year, reference
         FROM school_continuum WHERE {column} = ?1 ORDER BY year IS NULL, year, id"
    ))?;
    let rows = stmt
        .query_map([school_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, Option<i64>>(5)?,
                row.get::<_, Option<i64>>(6)?,
                row.get::<_, Option<String>>(7)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(
            |(id, active, target, description, day, month, year, reference)| {
                Ok(Continuum {
                    id,
                    active_school: school_summary(conn, active)?,
                    target_school: school_summary(conn, target)?,
                    description,
                    day,
                    month,
                    year,
                    reference,
                })
            },
        )
        .collect()
}

fn school_summary(conn: &Connection, id: i64) -> rusqlite::Result<SchoolSummary> {
    Ok(SchoolSummary {
        id,
        names: school_names(conn, id)?,
    })
}

/// Employerships matching `condition` on alias `e`, with principal names.
fn employerships(conn: &Connection, condition: &str, key: i64) -> rusqlite::Result<Vec<Employership>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT e.id, e.school_id, e.begin_year, e.end_year, e.reference,
                p.id, p.surname, p.first_name
         FROM employership e JOIN principal p ON p.id = e.principal_id
         WHERE {condition}
         ORDER BY e.begin_year IS NULL, e.begin_year, e.id"
    ))?;
    stmt.query_map([key], |row| {
        Ok(Employership {
            id: row.get(0)?,
            school_id: row.get(1)?,
            interval: interval(row, 2)?,
            reference: row.get(4)?,
            principal: PrincipalName {
                id: row.get(5)?,
                surname: row.get(6)?,
                first_name: row.get(7)?,
            },
        })
    })?
    .collect()
}

fn load_principal(conn: &Connection, id: i64) -> rusqlite::Result<Option<Principal>> {
    let row = conn
        .query_row(
            "SELECT surname, first_name FROM principal WHERE id = ?1",
            [id],
            |row| Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<String>>(1)?)),
        )
        .optional()?;
    let Some((surname, first_name)) = row else {
        return Ok(None);
    };
    Ok(Some(Principal {
        id,
        surname,
        first_name,
        employers: employerships(conn, "e.principal_id = ?1", id)?,
    }))
}

fn load_building(conn: &Connection, id: i64) -> rusqlite::Result<Option<Building>> {
    let building = conn
        .query_row(
            "SELECT b.id, n.name, b.construction_year, b.architect, b.architect_firm,
                    b.property_number, b.sliced, b.comment, b.reference, b.approx
             FROM building b LEFT JOIN neighborhood n ON n.id = b.neighborhood_id
             WHERE b.id = ?1",
            [id],
            |row| {
                Ok(Building {
                    id: row.get(0)?,
                    neighborhood: row.get(1)?,
                    addresses: Vec::new(),
                    construction_year: row.get(2)?,
                    architect: row.get(3)?,
                    architect_firm: row.get(4)?,
                    property_number: row.get(5)?,
                    sliced: row.get(6)?,
                    comment: row.get(7)?,
                    reference: row.get(8)?,
                    approx: row.get(9)?,
                    owners: Vec::new(),
                })
            },
        )
        .optional()?;
    let Some(mut building) = building else {
        return Ok(None);
    };
    building.addresses = addresses(conn, id)?;
    building.owners = ownerships(conn, "building_ownership", "building_id", id)?;
    Ok(Some(building))
}

fn addresses(conn: &Connection, building_id: i64) -> rusqlite::Result<Vec<Address>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.street_name_fi, a.street_name_sv, a.zip_code,
                a.municipality_fi, a.municipality_sv, a.latitude, a.longitude
         FROM building_address ba JOIN address a ON a.id = ba.address_id
         WHERE ba.building_id = ?1
         ORDER BY ba.id",
    )?;
    stmt.query_map([building_id], |row| {
        Ok(Address {
            id: row.get(0)?,
            street_name_fi: row.get(1)?,
            street_name_sv: row.get(2)?,
            zip_code: row.get(3)?,
            municipality_fi: row.get(4)?,
            municipality_sv: row.get(5)?,
            latitude: row.get(6)?,
            longitude: row.get(7)?,
        })
    })?
    .collect()
}

/// School buildings matching `condition`, with their building and photos.
fn school_buildings(
    conn: &Connection,
    condition: &str,
    key: i64,
) -> rusqlite::Result<Vec<SchoolBuilding>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, school_id, building_id, begin_year, end_year,
                approx_begin, approx_end, ownership, reference,
                begin_day, begin_month, end_day, end_month
         FROM school_building WHERE {condition} {CHRONOLOGICAL}"
    ))?;
    let rows = stmt
        .query_map([key], |row| {
            Ok((
                (
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ),
                interval(row, 3)?,
                DayPrecision {
                    begin_day: row.get(9)?,
                    begin_month: row.get(10)?,
                    end_day: row.get(11)?,
                    end_month: row.get(12)?,
                },
                row.get::<_, Option<bool>>(5)?,
                row.get::<_, Option<bool>>(6)?,
                row.get::<_, Option<bool>>(7)?,
                row.get::<_, Option<String>>(8)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut result = Vec::with_capacity(rows.len());
    for ((id, school_id, building_id), interval, dates, approx_begin, approx_end, ownership, reference) in
        rows
    {
        // The building row is guaranteed by the foreign key.
        let Some(building) = load_building(conn, building_id)? else {
            continue;
        };
        result.push(SchoolBuilding {
            id,
            school_id,
            building,
            photos: photos(conn, id)?,
            interval,
            dates,
            approx_begin,
            approx_end,
            ownership,
            reference,
        });
    }
    Ok(result)
}

fn photos(conn: &Connection, school_building_id: i64) -> rusqlite::Result<Vec<Photo>> {
    let mut stmt = conn.prepare(
        "SELECT id, url, is_front, curated FROM school_building_photo
         WHERE school_building_id = ?1 ORDER BY is_front DESC, id",
    )?;
    stmt.query_map(params![school_building_id], |row| {
        Ok(Photo {
            id: row.get(0)?,
            url: row.get(1)?,
            is_front: row.get(2)?,
            curated: row.get(3)?,
        })
    })?
    .collect()
}
