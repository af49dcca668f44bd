//! SQLite-backed warehouse row source.
//!
//! # Responsibility
//! - Open the warehouse extract read-only.
//! - Run the inventory query and decode rows by column name.
//!
//! # Invariants
//! - Decoding rejects malformed values instead of masking them.
//! - Connections are never written to.

use super::{RowSource, SourceError, SourceResult, REQUIRED_COLUMNS};
use crate::config::ConnectionParams;
use crate::model::row::SpaceRow;
use log::{error, info};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Row};
use std::time::{Duration, Instant};

/// Row source over a SQLite warehouse extract.
pub struct SqliteRowSource {
    conn: Connection,
}

impl SqliteRowSource {
    /// Opens the warehouse database described by `params`.
    ///
    /// # Side effects
    /// - Emits `source_open` logging events with duration and status.
    ///
    /// # Errors
    /// - Returns [`SourceError::Db`] when the database cannot be opened.
    pub fn open(params: &ConnectionParams) -> SourceResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=source_open module=source status=start target={}",
            params.target()
        );

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&params.database, flags)
            .and_then(|conn| {
                conn.busy_timeout(Duration::from_millis(params.busy_timeout_ms))?;
                Ok(conn)
            })
            .map_err(|err| {
                error!(
                    "event=source_open module=source status=error duration_ms={} error_code=source_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                SourceError::from(err)
            })?;

        info!(
            "event=source_open module=source status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(Self { conn })
    }

    /// Wraps an already-open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn fetch_inner(&self, query: &str) -> SourceResult<Vec<SpaceRow>> {
        let mut stmt = self.conn.prepare(query)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|required| !columns.iter().any(|column| column == *required))
        {
            return Err(SourceError::MissingColumn((*missing).to_string()));
        }

        let mut rows = stmt.query([])?;
        let mut space_rows = Vec::new();
        while let Some(row) = rows.next()? {
            space_rows.push(parse_space_row(row)?);
        }
        Ok(space_rows)
    }
}

impl RowSource for SqliteRowSource {
    fn fetch(&self, query: &str) -> SourceResult<Vec<SpaceRow>> {
        let started_at = Instant::now();
        info!("event=fetch module=source status=start");

        match self.fetch_inner(query) {
            Ok(rows) => {
                info!(
                    "event=fetch module=source status=ok rows={} duration_ms={}",
                    rows.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(rows)
            }
            Err(err) => {
                error!(
                    "event=fetch module=source status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn parse_space_row(row: &Row<'_>) -> SourceResult<SpaceRow> {
    let area = match row.get::<_, Value>("area")? {
        Value::Real(value) => value,
        Value::Integer(value) => value as f64,
        other => {
            return Err(SourceError::InvalidData(format!(
                "invalid area value `{other:?}` in column `area`"
            )));
        }
    };

    let desk_count = match row.get::<_, Option<i64>>("desk_count")? {
        None => 0,
        Some(value) => u32::try_from(value).map_err(|_| {
            SourceError::InvalidData(format!(
                "invalid desk_count value `{value}` in column `desk_count`"
            ))
        })?,
    };

    let space_row = SpaceRow {
        project: text_column(row, "project")?,
        floor: text_column(row, "floor")?,
        room: text_column(row, "room")?,
        space_type: text_column(row, "space_type")?,
        room_number: text_column(row, "room_number")?,
        area,
        desk_count,
    };
    space_row.validate()?;
    Ok(space_row)
}

// Warehouse labels are loosely typed: room numbers in particular are often
// stored as integers. NULL decodes to an empty string.
fn text_column(row: &Row<'_>, column: &str) -> SourceResult<String> {
    match row.get::<_, Value>(column)? {
        Value::Null => Ok(String::new()),
        Value::Text(value) => Ok(value),
        Value::Integer(value) => Ok(value.to_string()),
        Value::Real(value) => Ok(value.to_string()),
        Value::Blob(_) => Err(SourceError::InvalidData(format!(
            "unexpected blob value in column `{column}`"
        ))),
    }
}
