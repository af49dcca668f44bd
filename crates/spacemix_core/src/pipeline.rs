//! Fetch-then-reduce pipeline.
//!
//! # Responsibility
//! - Run one batch: fetch, partition, aggregate, check, report, render.
//!
//! # Invariants
//! - The source is queried exactly once per run.
//! - Every project is aggregated exactly once; the selected view reuses its
//!   entry in the aggregate map.
//! - Selection and color checks run before any report line is written or any
//!   chart is rendered.
//! - An empty dataset degrades to a "no data" report; it is not an error.
//! - Nothing is retried.

use crate::aggregate::partition::ProjectPartitions;
use crate::aggregate::space_type::aggregate_all;
use crate::aggregate::summary::CrossProjectSummary;
use crate::aggregate::AggregateError;
use crate::config::PipelineConfig;
use crate::model::row::RowValidationError;
use crate::report::{write_selected_project, write_summary};
use crate::source::{is_sorted_by_project, RowSource, SourceError};
use crate::view::chart::{ChartRenderer, PieChart};
use crate::view::selector::select_project;
use crate::view::ViewError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::time::Instant;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure of a pipeline run.
#[derive(Debug)]
pub enum PipelineError {
    Source(SourceError),
    InvalidRow(RowValidationError),
    Aggregate(AggregateError),
    View(ViewError),
    Io(io::Error),
}

impl PipelineError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Source(_) => "source_failed",
            Self::InvalidRow(_) => "invalid_row",
            Self::Aggregate(_) => "aggregate_failed",
            Self::View(ViewError::SelectionOutOfRange { .. }) => "selection_out_of_range",
            Self::View(ViewError::UnknownSpaceType(_)) => "unknown_space_type",
            Self::View(ViewError::Aggregate(_)) => "aggregate_failed",
            Self::Io(_) => "output_failed",
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "{err}"),
            Self::InvalidRow(err) => write!(f, "{err}"),
            Self::Aggregate(err) => write!(f, "{err}"),
            Self::View(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to write report: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::InvalidRow(err) => Some(err),
            Self::Aggregate(err) => Some(err),
            Self::View(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<SourceError> for PipelineError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<RowValidationError> for PipelineError {
    fn from(value: RowValidationError) -> Self {
        Self::InvalidRow(value)
    }
}

impl From<AggregateError> for PipelineError {
    fn from(value: AggregateError) -> Self {
        Self::Aggregate(value)
    }
}

impl From<ViewError> for PipelineError {
    fn from(value: ViewError) -> Self {
        Self::View(value)
    }
}

impl From<io::Error> for PipelineError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    /// The source returned no rows; only the no-data line was printed.
    NoData,
    Charted {
        summary: CrossProjectSummary,
        project: String,
        desk_count: u64,
        chart: PieChart,
    },
}

/// One-shot inventory pipeline built from an explicit configuration.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs the pipeline once against `source`.
    ///
    /// Report lines go to `out`; the selected project's chart goes to
    /// `renderer`.
    ///
    /// # Errors
    /// - [`PipelineError::Source`] when the fetch fails.
    /// - [`PipelineError::View`] for an out-of-range selection or a space type
    ///   without a color. Nothing is written in either case.
    /// - [`PipelineError::Io`] when writing the report or chart fails.
    pub fn run<S, W, R>(
        &self,
        source: &S,
        out: &mut W,
        renderer: &mut R,
    ) -> PipelineResult<RunReport>
    where
        S: RowSource + ?Sized,
        W: Write,
        R: ChartRenderer,
    {
        let started_at = Instant::now();
        info!(
            "event=pipeline_run module=pipeline status=start selected_project={}",
            self.config.selected_project
        );

        match self.run_inner(source, out, renderer) {
            Ok(report) => {
                info!(
                    "event=pipeline_run module=pipeline status=ok outcome={} duration_ms={}",
                    match report {
                        RunReport::NoData => "no_data",
                        RunReport::Charted { .. } => "charted",
                    },
                    started_at.elapsed().as_millis()
                );
                Ok(report)
            }
            Err(err) => {
                error!(
                    "event=pipeline_run module=pipeline status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn run_inner<S, W, R>(
        &self,
        source: &S,
        out: &mut W,
        renderer: &mut R,
    ) -> PipelineResult<RunReport>
    where
        S: RowSource + ?Sized,
        W: Write,
        R: ChartRenderer,
    {
        let rows = source.fetch(&self.config.query)?;
        let sorted = is_sorted_by_project(&rows);

        let mut partitions = ProjectPartitions::from_rows(rows)?;
        if !sorted {
            warn!(
                "event=source_order module=pipeline status=degraded projects={} action=sort_by_project",
                partitions.len()
            );
            partitions.sort_by_project();
        }

        if partitions.is_empty() {
            return report_no_data(out);
        }

        let aggregates = aggregate_all(&partitions)?;
        let view = select_project(&partitions, &aggregates, self.config.selected_project)?;
        let chart = view.chart(&self.config.colors)?;

        let Some(summary) = CrossProjectSummary::compute(&aggregates) else {
            return report_no_data(out);
        };
        info!(
            "event=aggregate module=pipeline status=ok projects={} selected={} space_types={}",
            summary.project_count,
            view.position,
            chart.slices.len()
        );

        write_summary(out, Some(&summary))?;
        write_selected_project(out, &view)?;
        out.flush()?;
        renderer.render(&chart)?;

        Ok(RunReport::Charted {
            summary,
            project: view.project().to_string(),
            desk_count: view.desk_count(),
            chart,
        })
    }
}

fn report_no_data<W: Write>(out: &mut W) -> PipelineResult<RunReport> {
    warn!("event=pipeline_run module=pipeline status=no_data");
    write_summary(out, None)?;
    out.flush()?;
    Ok(RunReport::NoData)
}
