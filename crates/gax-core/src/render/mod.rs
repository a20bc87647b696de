//! Output renderers, one per [`OutputFormat`].

pub mod csv_rows;
pub mod json;
pub mod umami;

use std::io::{self, Write};

use thiserror::Error;

use crate::report::{DayReport, RowError};
use crate::synthesis::{SessionUuidSource, SynthesisOptions};
use crate::types::OutputFormat;

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("malformed aggregate row: {0}")]
    Row(#[from] RowError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Counts describing what a render produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Aggregate rows read from the report.
    pub rows: usize,
    /// Sessions synthesized (Umami only).
    pub sessions: usize,
    /// Page views synthesized (Umami only).
    pub page_views: usize,
}

/// Renders `report` in `format` into `writer`.
///
/// `options` and `uuids` are only consulted by formats that synthesize visits.
pub fn render<W, U>(
    format: OutputFormat,
    report: &DayReport,
    options: &SynthesisOptions,
    uuids: &mut U,
    writer: &mut W,
) -> Result<RenderSummary, RenderError>
where
    W: Write + ?Sized,
    U: SessionUuidSource + ?Sized,
{
    let summary = match format {
        OutputFormat::Umami => umami::write_sql(report, options, uuids, writer)?,
        OutputFormat::Csv => csv_rows::write_csv(report, writer)?,
        OutputFormat::Json => {
            json::write_json(report, writer)?;
            RenderSummary {
                rows: report.values().map(Vec::len).sum(),
                ..RenderSummary::default()
            }
        }
    };

    tracing::debug!(
        %format,
        rows = summary.rows,
        sessions = summary.sessions,
        page_views = summary.page_views,
        "rendered report"
    );
    Ok(summary)
}
