//! Flat CSV export, one line per aggregate row.
//!
//! Fields are written as-is: no quoting, so values containing commas shift
//! the columns of their line.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::render::{RenderError, RenderSummary};
use crate::report::{DayReport, aggregate_rows};

/// CSV column headers in output order.
pub const CSV_HEADERS: [&str; 10] = [
    "path",
    "browser",
    "os",
    "device",
    "screen",
    "language",
    "country",
    "referral_path",
    "count",
    "date",
];

/// Writes the header and one line per aggregate row, in report order.
pub fn write_csv<W: Write + ?Sized>(
    report: &DayReport,
    writer: &mut W,
) -> Result<RenderSummary, RenderError> {
    let rows = aggregate_rows(report)?;

    let mut out = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    out.write_record(CSV_HEADERS)?;

    for row in &rows {
        let dims = &row.dimensions;
        let count = row.pageviews.to_string();
        let date = row.date.to_string();
        out.write_record([
            dims.path.as_str(),
            dims.browser.as_str(),
            dims.os.as_str(),
            dims.device.as_str(),
            dims.screen.as_str(),
            dims.language.as_str(),
            dims.country.as_str(),
            dims.referrer.as_str(),
            count.as_str(),
            date.as_str(),
        ])?;
    }
    out.flush()?;

    Ok(RenderSummary {
        rows: rows.len(),
        ..RenderSummary::default()
    })
}
