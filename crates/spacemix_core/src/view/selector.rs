//! Single-project view selector.

use super::chart::PieChart;
use super::palette::ColorTable;
use super::{ViewError, ViewResult};
use crate::aggregate::partition::ProjectPartitions;
use crate::aggregate::space_type::{ProjectAggregates, SpaceTypeAggregate};
use crate::aggregate::AggregateError;
use crate::model::row::SpaceRow;

/// Chart-ready view of one selected project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectView<'a> {
    /// Ordinal of the project in partition order.
    pub position: usize,
    pub rows: &'a [SpaceRow],
    pub aggregate: &'a SpaceTypeAggregate,
}

impl ProjectView<'_> {
    pub fn project(&self) -> &str {
        &self.aggregate.project
    }

    /// Sum of `desk_count` over the project's rows.
    pub fn desk_count(&self) -> u64 {
        self.aggregate.desk_count
    }

    pub fn space_types(&self) -> Vec<&str> {
        self.aggregate.space_types()
    }

    pub fn area_sums(&self) -> Vec<f64> {
        self.aggregate.area_sums()
    }

    pub fn total_area(&self) -> f64 {
        self.aggregate.total_area
    }

    /// Builds the pie chart input, resolving every space type's color.
    ///
    /// # Errors
    /// - [`ViewError::UnknownSpaceType`] when a type has no color.
    pub fn chart(&self, colors: &ColorTable) -> ViewResult<PieChart> {
        PieChart::from_buckets(self.project(), &self.aggregate.buckets, colors)
    }
}

/// Selects the project at ordinal `position` (zero-based, partition order).
///
/// The view borrows the project's rows from `partitions` and its aggregate
/// from `aggregates`; nothing is re-aggregated.
///
/// # Errors
/// - [`ViewError::SelectionOutOfRange`] when `position` is not below the
///   number of projects.
/// - [`ViewError::Aggregate`] when `aggregates` was not built from
///   `partitions`.
pub fn select_project<'a>(
    partitions: &'a ProjectPartitions,
    aggregates: &'a ProjectAggregates,
    position: usize,
) -> ViewResult<ProjectView<'a>> {
    let partition = partitions
        .get_index(position)
        .ok_or(ViewError::SelectionOutOfRange {
            requested: position,
            available: partitions.len(),
        })?;
    let aggregate = aggregates
        .get(&partition.project)
        .ok_or_else(|| AggregateError::MissingProject(partition.project.clone()))?;

    Ok(ProjectView {
        position,
        rows: &partition.rows,
        aggregate,
    })
}
