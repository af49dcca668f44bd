//! Pie chart model and renderer seam.
//!
//! # Responsibility
//! - Turn per-type area buckets into colored pie slices.
//! - Define the renderer contract and a console implementation.
//!
//! # Invariants
//! - Slice order equals bucket order.
//! - Every slice carries a color from the lookup table; building a chart
//!   with an uncolored space type fails and yields no chart.

use super::palette::{Color, ColorTable};
use super::{ViewError, ViewResult};
use crate::aggregate::space_type::SpaceTypeArea;
use serde::Serialize;
use std::io::{self, Write};

const BAR_WIDTH: usize = 40;

/// One colored pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub area: f64,
    /// Share of the chart total in `[0, 1]` for non-negative areas.
    pub fraction: f64,
    pub color: Color,
}

/// Chart input for one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    /// Builds a chart from area buckets.
    ///
    /// # Errors
    /// - [`ViewError::UnknownSpaceType`] naming the first bucket whose space
    ///   type is missing from `colors`.
    pub fn from_buckets(
        title: impl Into<String>,
        buckets: &[SpaceTypeArea],
        colors: &ColorTable,
    ) -> ViewResult<Self> {
        let total: f64 = buckets.iter().map(|bucket| bucket.area).sum();
        let slices = buckets
            .iter()
            .map(|bucket| -> ViewResult<PieSlice> {
                let color = colors
                    .get(&bucket.space_type)
                    .cloned()
                    .ok_or_else(|| ViewError::UnknownSpaceType(bucket.space_type.clone()))?;
                Ok(PieSlice {
                    label: bucket.space_type.clone(),
                    area: bucket.area,
                    fraction: if total == 0.0 {
                        0.0
                    } else {
                        bucket.area / total
                    },
                    color,
                })
            })
            .collect::<ViewResult<Vec<_>>>()?;

        Ok(Self {
            title: title.into(),
            slices,
        })
    }

    pub fn total_area(&self) -> f64 {
        self.slices.iter().map(|slice| slice.area).sum()
    }
}

/// Chart rendering collaborator.
pub trait ChartRenderer {
    fn render(&mut self, chart: &PieChart) -> io::Result<()>;
}

/// Renders a pie chart as a proportional bar listing on a text writer.
pub struct TextChartRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextChartRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for TextChartRenderer<W> {
    fn render(&mut self, chart: &PieChart) -> io::Result<()> {
        writeln!(self.out, "{}", chart.title)?;
        let label_width = chart
            .slices
            .iter()
            .map(|slice| slice.label.chars().count())
            .max()
            .unwrap_or(0);

        for slice in &chart.slices {
            let filled = bar_cells(slice.fraction);
            writeln!(
                self.out,
                "  {:<label_width$}  {}  {:>12.2} sf  {:>5.1}%  {}",
                slice.label,
                slice.color,
                slice.area,
                slice.fraction * 100.0,
                "#".repeat(filled),
            )?;
        }
        self.out.flush()
    }
}

fn bar_cells(fraction: f64) -> usize {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    ((fraction.min(1.0) * BAR_WIDTH as f64).round() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::{bar_cells, BAR_WIDTH};

    #[test]
    fn bar_cells_scales_and_clamps() {
        assert_eq!(bar_cells(0.0), 0);
        assert_eq!(bar_cells(f64::NAN), 0);
        assert_eq!(bar_cells(0.5), BAR_WIDTH / 2);
        assert_eq!(bar_cells(2.0), BAR_WIDTH);
        assert_eq!(bar_cells(0.0001), 1);
    }
}
