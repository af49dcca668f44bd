//! Postgres-protocol warehouse row source (Redshift, Postgres).
//!
//! # Responsibility
//! - Connect to the warehouse with the configured host, port, credentials
//!   and database.
//! - Run the inventory query with a runtime (`sqlx::query`) statement and
//!   decode rows by column name.
//!
//! # Invariants
//! - The client runtime is private to the source; callers stay synchronous.
//! - Decoding rejects malformed values instead of masking them.
//! - The password never appears in log lines.

use super::{RowSource, SourceError, SourceResult, REQUIRED_COLUMNS};
use crate::config::ConnectionParams;
use crate::model::row::SpaceRow;
use log::{error, info};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgSslMode};
use sqlx::{Column, Decode, Postgres, Row, Type};
use std::time::{Duration, Instant};
use tokio::runtime::{Builder, Runtime};

/// Row source over a Postgres-protocol warehouse.
pub struct PostgresRowSource {
    // Dropped before the runtime so connections close while it is alive.
    pool: PgPool,
    runtime: Runtime,
}

impl PostgresRowSource {
    /// Connects to the warehouse described by `params`.
    ///
    /// # Side effects
    /// - Starts a one-worker async runtime owned by the source.
    /// - Emits `source_open` logging events with duration and status.
    ///
    /// # Errors
    /// - Returns [`SourceError::Runtime`] when the runtime cannot start.
    /// - Returns [`SourceError::Warehouse`] when the connection fails or
    ///   does not complete within `connect_timeout_secs`.
    pub fn connect(params: &ConnectionParams) -> SourceResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=source_open module=source status=start target={}",
            params.target()
        );

        let result = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(SourceError::Runtime)
            .and_then(|runtime| {
                let pool = runtime.block_on(
                    PgPoolOptions::new()
                        .max_connections(1)
                        .acquire_timeout(Duration::from_secs(params.connect_timeout_secs))
                        .connect_with(connect_options(params)),
                )?;
                Ok(Self { pool, runtime })
            });

        match result {
            Ok(source) => {
                info!(
                    "event=source_open module=source status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(source)
            }
            Err(err) => {
                error!(
                    "event=source_open module=source status=error duration_ms={} error_code=source_open_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn fetch_inner(&self, query: &str) -> SourceResult<Vec<SpaceRow>> {
        let rows = self
            .runtime
            .block_on(sqlx::query(query).fetch_all(&self.pool))?;

        if let Some(first) = rows.first() {
            check_columns(first)?;
        }
        rows.iter().map(parse_space_row).collect()
    }
}

impl RowSource for PostgresRowSource {
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

/// Builds client options from `params`.
///
/// TLS is used when the server offers it, which is how Redshift clusters are
/// normally reached.
pub(crate) fn connect_options(params: &ConnectionParams) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&params.host)
        .port(params.port)
        .username(&params.user)
        .password(&params.password)
        .database(&params.database)
        .ssl_mode(PgSslMode::Prefer)
}

fn check_columns(row: &PgRow) -> SourceResult<()> {
    let columns: Vec<&str> = row.columns().iter().map(|column| column.name()).collect();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|required| !columns.contains(*required))
    {
        return Err(SourceError::MissingColumn((*missing).to_string()));
    }
    Ok(())
}

fn parse_space_row(row: &PgRow) -> SourceResult<SpaceRow> {
    let area = decode::<f64>(row, "area")
        .or_else(|| decode::<f32>(row, "area").map(|value| value.map(f64::from)))
        .or_else(|| decode::<i64>(row, "area").map(|value| value.map(|area| area as f64)))
        .or_else(|| decode::<i32>(row, "area").map(|value| value.map(f64::from)));
    let area = match area {
        Some(Some(area)) => area,
        Some(None) => {
            return Err(SourceError::InvalidData("null area value in column `area`".to_string()));
        }
        None => return Err(unsupported_type(row, "area")),
    };

    let desk_count = decode::<i64>(row, "desk_count")
        .or_else(|| decode::<i32>(row, "desk_count").map(|value| value.map(i64::from)))
        .or_else(|| decode::<i16>(row, "desk_count").map(|value| value.map(i64::from)))
        .ok_or_else(|| unsupported_type(row, "desk_count"))?;
    let desk_count = match desk_count {
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

// Labels may come back as integers (room numbers in particular). NULL decodes
// to an empty string.
fn text_column(row: &PgRow, column: &str) -> SourceResult<String> {
    let value = decode::<String>(row, column)
        .or_else(|| decode::<i64>(row, column).map(|value| value.map(|n| n.to_string())))
        .or_else(|| decode::<i32>(row, column).map(|value| value.map(|n| n.to_string())))
        .or_else(|| decode::<f64>(row, column).map(|value| value.map(|n| n.to_string())))
        .ok_or_else(|| unsupported_type(row, column))?;
    Ok(value.unwrap_or_default())
}

/// Decodes a nullable column as `T`; `None` when the column type does not
/// match `T`.
fn decode<'r, T>(row: &'r PgRow, column: &str) -> Option<Option<T>>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<Option<T>, _>(column).ok()
}

fn unsupported_type(row: &PgRow, column: &str) -> SourceError {
    let type_name = row
        .columns()
        .iter()
        .find(|candidate| candidate.name() == column)
        .map(|candidate| candidate.type_info().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    SourceError::InvalidData(format!("unsupported type `{type_name}` in column `{column}`"))
}

#[cfg(test)]
mod tests {
    use super::{connect_options, PostgresRowSource};
    use crate::config::ConnectionParams;
    use crate::source::SourceError;

    fn params() -> ConnectionParams {
        ConnectionParams {
            host: "warehouse.internal".to_string(),
            port: 5439,
            user: "analyst".to_string(),
            password: "s3cret".to_string(),
            database: "analyticdb".to_string(),
            ..ConnectionParams::default()
        }
    }

    #[test]
    fn connect_options_carry_connection_params() {
        let options = connect_options(&params());

        assert_eq!(options.get_host(), "warehouse.internal");
        assert_eq!(options.get_port(), 5439);
        assert_eq!(options.get_username(), "analyst");
        assert_eq!(options.get_database(), Some("analyticdb"));
    }

    #[test]
    fn unreachable_warehouse_returns_warehouse_error() {
        let params = ConnectionParams {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout_secs: 1,
            ..params()
        };

        let err = PostgresRowSource::connect(&params).err().unwrap();
        assert!(matches!(err, SourceError::Warehouse(_)));
        assert!(!err.to_string().contains("s3cret"));
    }
}
