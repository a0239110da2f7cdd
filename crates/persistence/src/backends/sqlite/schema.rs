//! SQLite schema definitions and migrations.

use rusqlite::Connection;

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, 1)?;
        migrate_schema(conn, 1)?;
    } else if current_version < SCHEMA_VERSION {
        migrate_schema(conn, current_version)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(StorageError::Backend(BackendError::MigrationError {
            message: format!(
                "database schema version {} is newer than supported version {}",
                current_version, SCHEMA_VERSION
            ),
        }));
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| internal(format!("Failed to create schema_version table: {}", e)))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| internal(format!("Failed to clear schema_version: {}", e)))?;

    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map_err(|e| internal(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS language (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS school_type_name (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT
        );

        CREATE TABLE IF NOT EXISTS school_field_name (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS neighborhood (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS school (
            id INTEGER PRIMARY KEY,
            special_features TEXT,
            wartime_school INTEGER,
            nicknames TEXT,
            checked INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS school_name (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            value TEXT NOT NULL,
            official TEXT,
            begin_year INTEGER,
            end_year INTEGER,
            reference TEXT
        );

        CREATE TABLE IF NOT EXISTS school_language (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            language_id INTEGER NOT NULL REFERENCES language(id),
            begin_year INTEGER,
            end_year INTEGER
        );

        CREATE TABLE IF NOT EXISTS school_type (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            type_id INTEGER NOT NULL REFERENCES school_type_name(id),
            begin_year INTEGER,
            end_year INTEGER
        );

        CREATE TABLE IF NOT EXISTS school_field (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            field_id INTEGER NOT NULL REFERENCES school_field_name(id),
            begin_year INTEGER,
            end_year INTEGER
        );

        CREATE TABLE IF NOT EXISTS school_gender (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            gender TEXT NOT NULL,
            begin_year INTEGER,
            end_year INTEGER
        );

        CREATE TABLE IF NOT EXISTS school_continuum (
            id INTEGER PRIMARY KEY,
            active_school_id INTEGER NOT NULL REFERENCES school(id),
            target_school_id INTEGER NOT NULL REFERENCES school(id),
            description TEXT NOT NULL,
            day INTEGER,
            month INTEGER,
            year INTEGER,
            reference TEXT
        );

        CREATE TABLE IF NOT EXISTS principal (
            id INTEGER PRIMARY KEY,
            surname TEXT,
            first_name TEXT
        );

        CREATE TABLE IF NOT EXISTS employership (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            principal_id INTEGER NOT NULL REFERENCES principal(id),
            begin_year INTEGER,
            end_year INTEGER,
            reference TEXT
        );

        CREATE TABLE IF NOT EXISTS building (
            id INTEGER PRIMARY KEY,
            neighborhood_id INTEGER REFERENCES neighborhood(id),
            construction_year INTEGER,
            architect TEXT,
            architect_firm TEXT,
            property_number TEXT,
            sliced INTEGER,
            comment TEXT,
            reference TEXT,
            approx INTEGER
        );

        CREATE TABLE IF NOT EXISTS address (
            id INTEGER PRIMARY KEY,
            street_name_fi TEXT,
            street_name_sv TEXT,
            zip_code TEXT,
            municipality_fi TEXT,
            municipality_sv TEXT,
            latitude REAL,
            longitude REAL
        );

        CREATE TABLE IF NOT EXISTS building_address (
            id INTEGER PRIMARY KEY,
            building_id INTEGER NOT NULL REFERENCES building(id),
            address_id INTEGER NOT NULL REFERENCES address(id)
        );

        CREATE TABLE IF NOT EXISTS school_building (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            building_id INTEGER NOT NULL REFERENCES building(id),
            begin_year INTEGER,
            end_year INTEGER,
            approx_begin INTEGER,
            approx_end INTEGER,
            ownership INTEGER,
            reference TEXT
        );

        CREATE TABLE IF NOT EXISTS school_building_photo (
            id INTEGER PRIMARY KEY,
            school_building_id INTEGER NOT NULL REFERENCES school_building(id),
            url TEXT NOT NULL,
            is_front INTEGER NOT NULL DEFAULT 0,
            curated INTEGER NOT NULL DEFAULT 0
        );
        ",
    )
    .map_err(|e| internal(format!("Failed to create tables: {}", e)))?;

    create_indexes(conn)
}

/// Indexes on the foreign keys filters hop through.
fn create_indexes(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_school_name_school ON school_name(school_id);
        CREATE INDEX IF NOT EXISTS idx_school_language_school ON school_language(school_id);
        CREATE INDEX IF NOT EXISTS idx_school_type_school ON school_type(school_id);
        CREATE INDEX IF NOT EXISTS idx_school_field_school ON school_field(school_id);
        CREATE INDEX IF NOT EXISTS idx_school_gender_school ON school_gender(school_id);
        CREATE INDEX IF NOT EXISTS idx_employership_school ON employership(school_id);
        CREATE INDEX IF NOT EXISTS idx_employership_principal ON employership(principal_id);
        CREATE INDEX IF NOT EXISTS idx_building_address_building ON building_address(building_id);
        CREATE INDEX IF NOT EXISTS idx_school_building_school ON school_building(school_id);
        CREATE INDEX IF NOT EXISTS idx_school_building_building ON school_building(building_id);
        CREATE INDEX IF NOT EXISTS idx_photo_school_building ON school_building_photo(school_building_id);
        ",
    )
    .map_err(|e| internal(format!("Failed to create indexes: {}", e)))
}

/// Run migrations from `from_version` up to [`SCHEMA_VERSION`].
fn migrate_schema(conn: &Connection, from_version: i32) -> StorageResult<()> {
    let mut version = from_version;

    while version < SCHEMA_VERSION {
        match version {
            1 => migrate_v1_to_v2(conn)?,
            _ => return Err(internal(format!("Unknown schema version: {}", version))),
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}

/// Migration from v1 to v2: grade counts, owners and founders, archives,
/// lifecycle events, other names and day precision for building use.
fn migrate_v1_to_v2(conn: &Connection) -> StorageResult<()> {
    let columns = [
        "ALTER TABLE school_building ADD COLUMN begin_day INTEGER",
        "ALTER TABLE school_building ADD COLUMN begin_month INTEGER",
        "ALTER TABLE school_building ADD COLUMN end_day INTEGER",
        "ALTER TABLE school_building ADD COLUMN end_month INTEGER",
    ];
    for sql in &columns {
        // Ignore errors for column already exists (idempotent migration)
        let _ = conn.execute(sql, []);
    }

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS school_name_other (
            id INTEGER PRIMARY KEY,
            school_name_id INTEGER NOT NULL REFERENCES school_name(id),
            value TEXT NOT NULL,
            type TEXT
        );

        CREATE TABLE IF NOT EXISTS school_grade_count (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            number INTEGER NOT NULL,
            begin_year INTEGER,
            end_year INTEGER
        );

        CREATE TABLE IF NOT EXISTS owner_founder_type (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS owner_founder (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            additional_info TEXT,
            type_id INTEGER NOT NULL REFERENCES owner_founder_type(id)
        );

        CREATE TABLE IF NOT EXISTS school_ownership (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            owner_id INTEGER NOT NULL REFERENCES owner_founder(id),
            begin_year INTEGER,
            end_year INTEGER,
            reference TEXT
        );

        CREATE TABLE IF NOT EXISTS school_founder (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            founder_id INTEGER NOT NULL REFERENCES owner_founder(id),
            reference TEXT
        );

        CREATE TABLE IF NOT EXISTS building_ownership (
            id INTEGER PRIMARY KEY,
            building_id INTEGER NOT NULL REFERENCES building(id),
            owner_id INTEGER NOT NULL REFERENCES owner_founder(id),
            begin_year INTEGER,
            end_year INTEGER,
            reference TEXT
        );

        CREATE TABLE IF NOT EXISTS archive_data_type (
            id INTEGER PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS archive_data_link (
            id INTEGER PRIMARY KEY,
            url TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS archive_data (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            location TEXT,
            link_id INTEGER REFERENCES archive_data_link(id),
            data_type_id INTEGER REFERENCES archive_data_type(id),
            begin_year INTEGER,
            end_year INTEGER
        );

        CREATE TABLE IF NOT EXISTS lifecycle_event_type (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS lifecycle_event (
            id INTEGER PRIMARY KEY,
            school_id INTEGER NOT NULL REFERENCES school(id),
            type_id INTEGER NOT NULL REFERENCES lifecycle_event_type(id),
            day INTEGER,
            month INTEGER,
            year INTEGER,
            decisionmaker TEXT,
            additional_info TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_school_name_other_name ON school_name_other(school_name_id);
        CREATE INDEX IF NOT EXISTS idx_grade_count_school ON school_grade_count(school_id);
        CREATE INDEX IF NOT EXISTS idx_school_ownership_school ON school_ownership(school_id);
        CREATE INDEX IF NOT EXISTS idx_school_founder_school ON school_founder(school_id);
        CREATE INDEX IF NOT EXISTS idx_building_ownership_building ON building_ownership(building_id);
        CREATE INDEX IF NOT EXISTS idx_archive_data_school ON archive_data(school_id);
        CREATE INDEX IF NOT EXISTS idx_lifecycle_event_school ON lifecycle_event(school_id);
        ",
    )
    .map_err(|e| {
        StorageError::Backend(BackendError::MigrationError {
            message: format!("v1 to v2: {}", e),
        })
    })
}

fn internal(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |_| Ok(()),
        )
        .is_ok()
    }

    #[test]
    fn test_schema_initialization() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in [
            "school",
            "school_name",
            "principal",
            "employership",
            "building",
            "school_building_photo",
            "school_grade_count",
            "owner_founder",
            "school_ownership",
            "school_founder",
            "building_ownership",
            "archive_data",
            "lifecycle_event",
            "school_name_other",
        ] {
            assert!(table_exists(&conn, table), "missing table {table}");
        }
    }

    #[test]
    fn test_schema_version() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_v1_database_is_migrated() {
        let conn = Connection::open_in_memory().unwrap();
        get_schema_version(&conn).unwrap();
        create_schema_v1(&conn).unwrap();
        set_schema_version(&conn, 1).unwrap();
        conn.execute_batch(
            "INSERT INTO school (id, checked) VALUES (1, 1);
             INSERT INTO building (id) VALUES (1);
             INSERT INTO school_building (id, school_id, building_id, begin_year)
             VALUES (1, 1, 1, 1920);",
        )
        .unwrap();

        initialize_schema(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(table_exists(&conn, "lifecycle_event"));
        let (year, day): (Option<i64>, Option<i64>) = conn
            .query_row(
                "SELECT begin_year, begin_day FROM school_building WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!((year, day), (Some(1920), None));
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        set_schema_version(&conn, SCHEMA_VERSION + 1).unwrap();
        assert!(matches!(
            initialize_schema(&conn),
            Err(StorageError::Backend(BackendError::MigrationError { .. }))
        ));
    }
}
