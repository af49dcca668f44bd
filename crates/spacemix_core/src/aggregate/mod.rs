//! Aggregation core: project partitioning, space-type area reduction and the
//! cross-project summary.
//!
//! # Responsibility
//! - Turn the flat fetched row set into per-project aggregates in one
//!   forward pass per stage.
//!
//! # Invariants
//! - Partitions are a disjoint cover of the fetched rows.
//! - Project order is first-seen order (alphabetical for a sorted source).
//! - Per-type bucket areas sum to the project's total area.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod partition;
pub mod space_type;
pub mod summary;

pub type AggregateResult<T> = Result<T, AggregateError>;

/// Error raised by aggregation entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// Aggregation was requested for a project without rows.
    EmptyPartition(String),
    /// A partitioned project has no entry in the aggregate map.
    MissingProject(String),
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPartition(project) => {
                write!(f, "project `{project}` has no rows to aggregate")
            }
            Self::MissingProject(project) => {
                write!(f, "no aggregate was computed for project `{project}`")
            }
        }
    }
}

impl Error for AggregateError {}
