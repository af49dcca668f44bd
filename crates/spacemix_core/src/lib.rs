//! Space-mix analytics over the room inventory warehouse.
//!
//! Fetches room rows once, partitions them by project, reduces area per
//! space type, and charts the space-type mix of one selected project.

pub mod aggregate;
pub mod config;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod view;

pub use aggregate::partition::{ProjectPartition, ProjectPartitions};
pub use aggregate::space_type::{
    aggregate_all, aggregate_project, distinct_space_types, ProjectAggregates, SpaceTypeAggregate,
    SpaceTypeArea,
};
pub use aggregate::summary::{average_total_area, CrossProjectSummary, ProjectTotal};
pub use aggregate::{AggregateError, AggregateResult};
pub use config::{Backend, ConfigError, ConfigResult, ConnectionParams, PipelineConfig};
pub use logging::{default_log_level, init_logging, LogSettings, LoggingError};
pub use model::row::{RowValidationError, SpaceRow};
pub use pipeline::{Pipeline, PipelineError, PipelineResult, RunReport};
pub use source::{
    is_sorted_by_project, PostgresRowSource, RowSource, SourceError, SourceResult,
    SqliteRowSource, StaticRowSource, DEFAULT_SPACE_QUERY,
};
pub use view::chart::{ChartRenderer, PieChart, PieSlice, TextChartRenderer};
pub use view::palette::{Color, ColorError, ColorTable};
pub use view::selector::{select_project, ProjectView};
pub use view::{ViewError, ViewResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
