//! Space-type aggregator.
//!
//! # Responsibility
//! - Reduce one project's rows to per-space-type area buckets.
//! - Build the ordered project → aggregate map for the whole row set.
//!
//! # Invariants
//! - Bucket order is first-seen order of `space_type` within the partition.
//! - One bucket per distinct `space_type` string (exact match).
//! - `total_area` is the plain sum of every row's area.

use super::partition::ProjectPartitions;
use super::{AggregateError, AggregateResult};
use crate::model::row::SpaceRow;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Summed area for one space type inside one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceTypeArea {
    pub space_type: String,
    pub area: f64,
}

/// Aggregate record for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceTypeAggregate {
    pub project: String,
    /// Per-type area sums in first-seen order.
    pub buckets: Vec<SpaceTypeArea>,
    pub total_area: f64,
    pub desk_count: u64,
    pub room_count: usize,
}

impl SpaceTypeAggregate {
    /// Distinct space types, aligned with [`Self::area_sums`].
    pub fn space_types(&self) -> Vec<&str> {
        self.buckets
            .iter()
            .map(|bucket| bucket.space_type.as_str())
            .collect()
    }

    pub fn area_sums(&self) -> Vec<f64> {
        self.buckets.iter().map(|bucket| bucket.area).collect()
    }

    /// Summed area of `space_type`, or `None` when the project has none.
    pub fn area_for(&self, space_type: &str) -> Option<f64> {
        self.buckets
            .iter()
            .find(|bucket| bucket.space_type == space_type)
            .map(|bucket| bucket.area)
    }
}

/// Returns distinct space types of `rows` in first-seen order.
pub fn distinct_space_types(rows: &[SpaceRow]) -> Vec<String> {
    let mut seen = HashSet::<&str>::new();
    rows.iter()
        .filter(|row| seen.insert(row.space_type.as_str()))
        .map(|row| row.space_type.clone())
        .collect()
}

/// Aggregates one project's rows.
///
/// # Errors
/// - [`AggregateError::EmptyPartition`] when `rows` is empty.
pub fn aggregate_project(
    project: &str,
    rows: &[SpaceRow],
) -> AggregateResult<SpaceTypeAggregate> {
    if rows.is_empty() {
        return Err(AggregateError::EmptyPartition(project.to_string()));
    }

    let mut slots = HashMap::<&str, usize>::new();
    let mut buckets: Vec<SpaceTypeArea> = Vec::new();
    for row in rows {
        let slot = *slots.entry(row.space_type.as_str()).or_insert_with(|| {
            buckets.push(SpaceTypeArea {
                space_type: row.space_type.clone(),
                area: 0.0,
            });
            buckets.len() - 1
        });
        buckets[slot].area += row.area;
    }

    Ok(SpaceTypeAggregate {
        project: project.to_string(),
        buckets,
        total_area: rows.iter().map(|row| row.area).sum(),
        desk_count: rows.iter().map(|row| u64::from(row.desk_count)).sum(),
        room_count: rows.len(),
    })
}

/// Ordered project → aggregate map, aligned with the source partitions.
///
/// Lookup by project name goes through a name → slot index built alongside
/// the ordered list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectAggregates {
    aggregates: Vec<SpaceTypeAggregate>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ProjectAggregates {
    fn from_ordered(aggregates: Vec<SpaceTypeAggregate>) -> Self {
        let index = aggregates
            .iter()
            .enumerate()
            .map(|(slot, aggregate)| (aggregate.project.clone(), slot))
            .collect();
        Self { aggregates, index }
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    pub fn get(&self, project: &str) -> Option<&SpaceTypeAggregate> {
        self.index.get(project).map(|&slot| &self.aggregates[slot])
    }

    /// Total areas of every project in partition order.
    pub fn total_areas(&self) -> Vec<f64> {
        self.aggregates
            .iter()
            .map(|aggregate| aggregate.total_area)
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpaceTypeAggregate> {
        self.aggregates.iter()
    }
}

/// Aggregates every partition in order.
pub fn aggregate_all(partitions: &ProjectPartitions) -> AggregateResult<ProjectAggregates> {
    let aggregates = partitions
        .iter()
        .map(|partition| aggregate_project(&partition.project, &partition.rows))
        .collect::<AggregateResult<Vec<_>>>()?;
    Ok(ProjectAggregates::from_ordered(aggregates))
}
