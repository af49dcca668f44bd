//! Cross-project summary.
//!
//! # Invariants
//! - An empty dataset has no summary; callers report "no data" instead of
//!   dividing by zero.
//! - `average_total_area == total_area / project_count`.

use super::space_type::ProjectAggregates;
use serde::Serialize;

/// One project's name with its total area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTotal {
    pub project: String,
    pub total_area: f64,
}

/// Counts and averages across every harvested project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossProjectSummary {
    pub project_count: usize,
    pub total_area: f64,
    pub average_total_area: f64,
    pub desk_count: u64,
    /// First project with the largest total area.
    pub largest: ProjectTotal,
    /// First project with the smallest total area.
    pub smallest: ProjectTotal,
}

impl CrossProjectSummary {
    /// Summarizes `aggregates`, returning `None` when there are no projects.
    pub fn compute(aggregates: &ProjectAggregates) -> Option<Self> {
        let average_total_area = average_total_area(&aggregates.total_areas())?;

        let mut iter = aggregates.iter();
        let first = iter.next()?;
        let mut largest = first;
        let mut smallest = first;
        for aggregate in iter {
            if aggregate.total_area > largest.total_area {
                largest = aggregate;
            }
            if aggregate.total_area < smallest.total_area {
                smallest = aggregate;
            }
        }

        Some(Self {
            project_count: aggregates.len(),
            total_area: aggregates
                .iter()
                .map(|aggregate| aggregate.total_area)
                .sum(),
            average_total_area,
            desk_count: aggregates
                .iter()
                .map(|aggregate| aggregate.desk_count)
                .sum(),
            largest: ProjectTotal {
                project: largest.project.clone(),
                total_area: largest.total_area,
            },
            smallest: ProjectTotal {
                project: smallest.project.clone(),
                total_area: smallest.total_area,
            },
        })
    }
}

/// Arithmetic mean of per-project total areas.
///
/// Returns `None` for an empty slice.
pub fn average_total_area(total_areas: &[f64]) -> Option<f64> {
    if total_areas.is_empty() {
        return None;
    }
    let sum: f64 = total_areas.iter().sum();
    Some(sum / total_areas.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::average_total_area;

    #[test]
    fn average_of_empty_is_none() {
        assert_eq!(average_total_area(&[]), None);
    }

    #[test]
    fn average_divides_sum_by_count() {
        assert_eq!(average_total_area(&[150.0, 200.0]), Some(175.0));
    }
}
