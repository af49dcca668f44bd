use rusqlite::Connection;
use spacemix_core::{
    Backend, ConnectionParams, RowSource, SourceError, SqliteRowSource, DEFAULT_SPACE_QUERY,
};
use std::path::Path;

const WAREHOUSE_SQL: &str = include_str!("fixtures/warehouse.sql");

#[test]
fn default_query_filters_dead_excluded_and_empty_spaces() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_warehouse(dir.path());
    let source = SqliteRowSource::open(&params(&path)).unwrap();

    let rows = source.fetch(DEFAULT_SPACE_QUERY).unwrap();

    let projects: Vec<&str> = rows.iter().map(|row| row.project.as_str()).collect();
    assert_eq!(
        projects,
        vec![
            "10 Alpha St",
            "10 Alpha St",
            "10 Alpha St",
            "10 Alpha St",
            "20 Beta Ave",
            "20 Beta Ave",
        ]
    );
    assert!(rows.iter().all(|row| row.area > 0.0));
    assert!(!rows.iter().any(|row| row.project == "30 Gamma Rd"));
    assert!(!rows.iter().any(|row| row.project == "40 Delta Blvd"));
}

#[test]
fn default_query_orders_rooms_within_project() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_warehouse(dir.path());
    let source = SqliteRowSource::open(&params(&path)).unwrap();

    let rows = source.fetch(DEFAULT_SPACE_QUERY).unwrap();
    let alpha: Vec<&str> = rows
        .iter()
        .filter(|row| row.project == "10 Alpha St")
        .map(|row| row.room_number.as_str())
        .collect();
    assert_eq!(alpha, vec!["101", "102", "201", "202"]);

    let first = &rows[0];
    assert_eq!(first.floor, "Floor 1");
    assert_eq!(first.room, "Desk Bay A");
    assert_eq!(first.space_type, "WORK");
    assert_eq!(first.area, 500.0);
    assert_eq!(first.desk_count, 20);
}

#[test]
fn null_desk_count_decodes_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = seed_warehouse(dir.path());
    let source = SqliteRowSource::open(&params(&path)).unwrap();

    let rows = source.fetch(DEFAULT_SPACE_QUERY).unwrap();
    let booth = rows.iter().find(|row| row.room == "Phone Booth").unwrap();
    assert_eq!(booth.desk_count, 0);
}

#[test]
fn loosely_typed_columns_are_widened() {
    let source = SqliteRowSource::from_connection(Connection::open_in_memory().unwrap());

    let rows = source
        .fetch(
            "SELECT 'P' AS project, NULL AS floor, 'R' AS room, 'WORK' AS space_type,
                    7 AS room_number, 12 AS area, NULL AS desk_count",
        )
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].room_number, "7");
    assert_eq!(rows[0].floor, "");
    assert_eq!(rows[0].area, 12.0);
    assert_eq!(rows[0].desk_count, 0);
}

#[test]
fn missing_column_is_reported_by_name() {
    let source = SqliteRowSource::from_connection(Connection::open_in_memory().unwrap());

    let err = source.fetch("SELECT 'P' AS project").unwrap_err();
    assert!(matches!(err, SourceError::MissingColumn(column) if column == "floor"));
}

#[test]
fn negative_desk_count_is_invalid_data() {
    let source = SqliteRowSource::from_connection(Connection::open_in_memory().unwrap());

    let err = source
        .fetch(
            "SELECT 'P' AS project, '' AS floor, '' AS room, 'WORK' AS space_type,
                    '1' AS room_number, 10.0 AS area, -2 AS desk_count",
        )
        .unwrap_err();
    assert!(matches!(err, SourceError::InvalidData(message) if message.contains("desk_count")));
}

#[test]
fn non_numeric_area_is_invalid_data() {
    let source = SqliteRowSource::from_connection(Connection::open_in_memory().unwrap());

    let err = source
        .fetch(
            "SELECT 'P' AS project, '' AS floor, '' AS room, 'WORK' AS space_type,
                    '1' AS room_number, 'big' AS area, 1 AS desk_count",
        )
        .unwrap_err();
    assert!(matches!(err, SourceError::InvalidData(message) if message.contains("area")));
}

#[test]
fn blank_project_is_rejected() {
    let source = SqliteRowSource::from_connection(Connection::open_in_memory().unwrap());

    let err = source
        .fetch(
            "SELECT '  ' AS project, '' AS floor, '' AS room, 'WORK' AS space_type,
                    '9' AS room_number, 10.0 AS area, 1 AS desk_count",
        )
        .unwrap_err();
    assert!(matches!(err, SourceError::InvalidRow(_)));
}

#[test]
fn opening_missing_database_returns_db_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.db");

    let err = SqliteRowSource::open(&params(&missing)).err().unwrap();
    assert!(matches!(err, SourceError::Db(_)));
}

#[test]
fn malformed_query_returns_db_error() {
    let source = SqliteRowSource::from_connection(Connection::open_in_memory().unwrap());

    let err = source.fetch("SELECT FROM nowhere").unwrap_err();
    assert!(matches!(err, SourceError::Db(_)));
}

fn seed_warehouse(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("warehouse.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(WAREHOUSE_SQL).unwrap();
    path
}

fn params(path: &Path) -> ConnectionParams {
    ConnectionParams {
        backend: Backend::Sqlite,
        database: path.to_string_lossy().into_owned(),
        busy_timeout_ms: 1_000,
        ..ConnectionParams::default()
    }
}
