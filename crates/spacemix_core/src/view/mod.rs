//! Single-project view selection and chart preparation.
//!
//! # Responsibility
//! - Pick one project by ordinal and expose its chart-ready aggregates.
//! - Resolve display colors for every space type before rendering starts.
//!
//! # Invariants
//! - Selection and color checks fail fast; nothing is rendered for a view
//!   that fails either check.
//! - Unknown space types are never defaulted to a color.

use crate::aggregate::AggregateError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod chart;
pub mod palette;
pub mod selector;

pub type ViewResult<T> = Result<T, ViewError>;

/// Pre-flight failures of the selected-project view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The fixed ordinal does not address a harvested project.
    SelectionOutOfRange { requested: usize, available: usize },
    /// A space type has no entry in the color lookup table.
    UnknownSpaceType(String),
    Aggregate(AggregateError),
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectionOutOfRange {
                requested,
                available,
            } => write!(
                f,
                "project index {requested} is out of range: {available} projects available"
            ),
            Self::UnknownSpaceType(space_type) => {
                write!(f, "no chart color configured for space type `{space_type}`")
            }
            Self::Aggregate(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Aggregate(err) => Some(err),
            Self::SelectionOutOfRange { .. } | Self::UnknownSpaceType(_) => None,
        }
    }
}

impl From<AggregateError> for ViewError {
    fn from(value: AggregateError) -> Self {
        Self::Aggregate(value)
    }
}
