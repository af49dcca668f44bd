//! Warehouse row source contracts.
//!
//! # Responsibility
//! - Define the one-shot fetch contract consumed by the pipeline.
//! - Own the fixed inventory query and the source-side ordering invariant.
//!
//! # Invariants
//! - A source returns rows ordered by `(project, room_number)`.
//! - Returned rows have passed `SpaceRow::validate()`.
//! - Rows of `Dead` projects and rows with `area <= 0` are filtered by the query.

use crate::model::row::{RowValidationError, SpaceRow};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod postgres;
mod sqlite;

pub use postgres::PostgresRowSource;
pub use sqlite::SqliteRowSource;

/// Fixed inventory query against the warehouse BI tables.
pub const DEFAULT_SPACE_QUERY: &str = "SELECT DISTINCT
    pr.address1 AS project,
    fl.description AS floor,
    rm.name AS room,
    rm.program_type AS space_type,
    rm.number AS room_number,
    CAST(rm.area_sf AS DOUBLE PRECISION) AS area,
    rm.desk_count AS desk_count
FROM bi_space AS rm
INNER JOIN bi_floor AS fl ON fl.current_harvest_sync_uuid = rm.harvest_sync_log_uuid
INNER JOIN bi_property AS pr ON pr.uuid = fl.property_uuid
INNER JOIN bi_project AS pj ON pj.property_uuid = pr.uuid
INNER JOIN bi_projecttype AS t ON pj.type_id = t.id
INNER JOIN bi_status AS pjstat ON pjstat.id = pj.status_id
WHERE pjstat.name != 'Dead'
  AND t.name IN ('PxWe', 'Enterprise - Custom', 'Enterprise - Off the Shelf')
  AND rm.area_sf > 0
ORDER BY project, room_number";

/// Column aliases every inventory query must return.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "project",
    "floor",
    "room",
    "space_type",
    "room_number",
    "area",
    "desk_count",
];

pub type SourceResult<T> = Result<T, SourceError>;

/// Error raised while connecting to or reading from the warehouse.
#[derive(Debug)]
pub enum SourceError {
    /// SQLite extract failure.
    Db(rusqlite::Error),
    /// Postgres-protocol warehouse failure (connect, auth, or query).
    Warehouse(sqlx::Error),
    /// The async runtime driving the warehouse client could not start.
    Runtime(std::io::Error),
    /// The query result does not expose one of [`REQUIRED_COLUMNS`].
    MissingColumn(String),
    InvalidData(String),
    InvalidRow(RowValidationError),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "warehouse error: {err}"),
            Self::Warehouse(err) => write!(f, "warehouse error: {err}"),
            Self::Runtime(err) => write!(f, "failed to start warehouse client runtime: {err}"),
            Self::MissingColumn(column) => {
                write!(f, "inventory query result is missing column `{column}`")
            }
            Self::InvalidData(message) => write!(f, "invalid inventory row: {message}"),
            Self::InvalidRow(err) => write!(f, "invalid inventory row: {err}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Warehouse(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::InvalidRow(err) => Some(err),
            Self::MissingColumn(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for SourceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(value)
    }
}

impl From<sqlx::Error> for SourceError {
    fn from(value: sqlx::Error) -> Self {
        Self::Warehouse(value)
    }
}

impl From<RowValidationError> for SourceError {
    fn from(value: RowValidationError) -> Self {
        Self::InvalidRow(value)
    }
}

/// Tabular provider of inventory rows.
///
/// Consumed exactly once per run; the fetch is treated as atomic.
pub trait RowSource {
    fn fetch(&self, query: &str) -> SourceResult<Vec<SpaceRow>>;
}

impl<S: RowSource + ?Sized> RowSource for &S {
    fn fetch(&self, query: &str) -> SourceResult<Vec<SpaceRow>> {
        (**self).fetch(query)
    }
}

/// In-memory source serving a fixed row set regardless of query text.
///
/// Used to inject fixtures into the pipeline.
#[derive(Debug, Clone, Default)]
pub struct StaticRowSource {
    rows: Vec<SpaceRow>,
}

impl StaticRowSource {
    pub fn new(rows: Vec<SpaceRow>) -> Self {
        Self { rows }
    }
}

impl RowSource for StaticRowSource {
    fn fetch(&self, _query: &str) -> SourceResult<Vec<SpaceRow>> {
        Ok(self.rows.clone())
    }
}

/// Returns whether rows honor the source ordering contract (non-decreasing
/// `project`).
pub fn is_sorted_by_project(rows: &[SpaceRow]) -> bool {
    rows.windows(2)
        .all(|pair| pair[0].project <= pair[1].project)
}

#[cfg(test)]
mod tests {
    use super::{is_sorted_by_project, DEFAULT_SPACE_QUERY, REQUIRED_COLUMNS};
    use crate::model::row::SpaceRow;

    #[test]
    fn sorted_check_accepts_grouped_ascending_projects() {
        let rows = vec![
            SpaceRow::new("A", "WORK", 1.0, 0),
            SpaceRow::new("A", "MEET", 1.0, 0),
            SpaceRow::new("B", "WORK", 1.0, 0),
        ];
        assert!(is_sorted_by_project(&rows));
        assert!(is_sorted_by_project(&[]));
    }

    #[test]
    fn sorted_check_rejects_interleaved_projects() {
        let rows = vec![
            SpaceRow::new("B", "WORK", 1.0, 0),
            SpaceRow::new("A", "WORK", 1.0, 0),
        ];
        assert!(!is_sorted_by_project(&rows));
    }

    #[test]
    fn default_query_selects_every_required_column() {
        for column in REQUIRED_COLUMNS {
            assert!(
                DEFAULT_SPACE_QUERY.contains(&format!("AS {column}")),
                "query does not alias `{column}`"
            );
        }
        assert!(DEFAULT_SPACE_QUERY.contains("ORDER BY project"));
    }
}
