//! Console summary reporter.
//!
//! Writes plain-text lines; formatting is stable so scripts can grep it.

use crate::aggregate::summary::CrossProjectSummary;
use crate::view::selector::ProjectView;
use std::io::{self, Write};

/// Line printed instead of the summary when the source returned no rows.
pub const NO_DATA_MESSAGE: &str = "No data: the row source returned no rows";

/// Writes the cross-project summary, or the no-data line when `summary` is
/// `None`.
pub fn write_summary<W: Write>(
    out: &mut W,
    summary: Option<&CrossProjectSummary>,
) -> io::Result<()> {
    let Some(summary) = summary else {
        return writeln!(out, "{NO_DATA_MESSAGE}");
    };

    writeln!(
        out,
        "Number of harvested projects: {}",
        summary.project_count
    )?;
    writeln!(
        out,
        "Average total area per project: {:.2} sf",
        summary.average_total_area
    )?;
    writeln!(out, "Total harvested area: {:.2} sf", summary.total_area)?;
    writeln!(out, "Total desk count: {}", summary.desk_count)?;
    writeln!(
        out,
        "Largest project: {} ({:.2} sf)",
        summary.largest.project, summary.largest.total_area
    )?;
    writeln!(
        out,
        "Smallest project: {} ({:.2} sf)",
        summary.smallest.project, summary.smallest.total_area
    )
}

/// Writes the selected project's headline numbers.
pub fn write_selected_project<W: Write>(out: &mut W, view: &ProjectView<'_>) -> io::Result<()> {
    writeln!(out, "Selected project: {}", view.project())?;
    writeln!(out, "Desk count: {}", view.desk_count())?;
    writeln!(out, "Total area: {:.2} sf", view.total_area())?;
    writeln!(out, "Space types: {}", view.space_types().join(", "))
}

#[cfg(test)]
mod tests {
    use super::{write_summary, NO_DATA_MESSAGE};
    use crate::aggregate::summary::{CrossProjectSummary, ProjectTotal};

    #[test]
    fn empty_dataset_prints_no_data_line() {
        let mut out = Vec::new();
        write_summary(&mut out, None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("{NO_DATA_MESSAGE}\n")
        );
    }

    #[test]
    fn summary_prints_count_and_average() {
        let summary = CrossProjectSummary {
            project_count: 2,
            total_area: 350.0,
            average_total_area: 175.0,
            desk_count: 12,
            largest: ProjectTotal {
                project: "B".to_string(),
                total_area: 200.0,
            },
            smallest: ProjectTotal {
                project: "A".to_string(),
                total_area: 150.0,
            },
        };
        let mut out = Vec::new();
        write_summary(&mut out, Some(&summary)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Number of harvested projects: 2\n"));
        assert!(text.contains("Average total area per project: 175.00 sf\n"));
        assert!(text.contains("Largest project: B (200.00 sf)"));
    }
}
