//! Space inventory row.
//!
//! # Responsibility
//! - Define one room/space record as delivered by the warehouse query.
//! - Enforce the single local constraint on rows before aggregation.
//!
//! # Invariants
//! - `project` is non-empty after trimming.
//! - `area` is not range-checked here: the source filters `area > 0`, and
//!   anything else that slips through is summed as-is.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One room/space row from the inventory warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceRow {
    /// Project (property address) the room belongs to.
    pub project: String,
    /// Floor description, empty when the warehouse has none.
    pub floor: String,
    /// Room display name.
    pub room: String,
    /// Program type of the room, e.g. `WORK` or `MEET`.
    pub space_type: String,
    pub room_number: String,
    /// Room area in square feet.
    pub area: f64,
    pub desk_count: u32,
}

impl SpaceRow {
    /// Creates a row with empty floor/room/room-number metadata.
    ///
    /// Convenient for fixtures and callers that only care about the
    /// aggregation-relevant fields.
    pub fn new(
        project: impl Into<String>,
        space_type: impl Into<String>,
        area: f64,
        desk_count: u32,
    ) -> Self {
        Self {
            project: project.into(),
            floor: String::new(),
            room: String::new(),
            space_type: space_type.into(),
            room_number: String::new(),
            area,
            desk_count,
        }
    }

    /// Validates local row invariants.
    ///
    /// # Errors
    /// - [`RowValidationError::EmptyProject`] when `project` is blank.
    pub fn validate(&self) -> Result<(), RowValidationError> {
        if self.project.trim().is_empty() {
            return Err(RowValidationError::EmptyProject {
                room_number: self.room_number.clone(),
            });
        }
        Ok(())
    }
}

/// Row-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValidationError {
    /// Every row must name the project it belongs to.
    EmptyProject { room_number: String },
}

impl Display for RowValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProject { room_number } if room_number.is_empty() => {
                write!(f, "row has an empty project")
            }
            Self::EmptyProject { room_number } => {
                write!(f, "row for room `{room_number}` has an empty project")
            }
        }
    }
}

impl Error for RowValidationError {}
