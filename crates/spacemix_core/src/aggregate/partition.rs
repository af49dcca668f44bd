//! Project partitioner.
//!
//! Splits the flat row set into one partition per distinct project, keeping
//! source order inside each partition and first-seen order across them.

use crate::model::row::{RowValidationError, SpaceRow};
use std::collections::HashMap;

/// Rows belonging to one project, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPartition {
    pub project: String,
    pub rows: Vec<SpaceRow>,
}

/// Ordered mapping from project name to its rows.
///
/// Names and rows live in one structure so positional lookups can never drift
/// from name lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPartitions {
    partitions: Vec<ProjectPartition>,
    index: HashMap<String, usize>,
}

impl ProjectPartitions {
    /// Partitions `rows` by project.
    ///
    /// Empty input yields an empty mapping.
    ///
    /// # Errors
    /// - Returns the first [`RowValidationError`] when a row has no project.
    pub fn from_rows(rows: Vec<SpaceRow>) -> Result<Self, RowValidationError> {
        let mut partitions = Self::default();
        for row in rows {
            row.validate()?;
            partitions.push(row);
        }
        Ok(partitions)
    }

    fn push(&mut self, row: SpaceRow) {
        if let Some(&slot) = self.index.get(row.project.as_str()) {
            self.partitions[slot].rows.push(row);
            return;
        }

        self.index
            .insert(row.project.clone(), self.partitions.len());
        self.partitions.push(ProjectPartition {
            project: row.project.clone(),
            rows: vec![row],
        });
    }

    /// Reorders partitions ascending by project name.
    ///
    /// Used when the source did not deliver rows ordered by project, so that
    /// ordinal selection stays deterministic.
    pub fn sort_by_project(&mut self) {
        self.partitions
            .sort_by(|left, right| left.project.cmp(&right.project));
        self.index = self
            .partitions
            .iter()
            .enumerate()
            .map(|(slot, partition)| (partition.project.clone(), slot))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Distinct project names in partition order.
    pub fn project_names(&self) -> Vec<&str> {
        self.partitions
            .iter()
            .map(|partition| partition.project.as_str())
            .collect()
    }

    /// Returns the rows of `project`, if present.
    pub fn rows(&self, project: &str) -> Option<&[SpaceRow]> {
        self.index
            .get(project)
            .map(|&slot| self.partitions[slot].rows.as_slice())
    }

    /// Returns the partition at ordinal `position`.
    pub fn get_index(&self, position: usize) -> Option<&ProjectPartition> {
        self.partitions.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectPartition> {
        self.partitions.iter()
    }
}

impl<'a> IntoIterator for &'a ProjectPartitions {
    type Item = &'a ProjectPartition;
    type IntoIter = std::slice::Iter<'a, ProjectPartition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
