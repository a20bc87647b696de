//! SQL inserts for the Umami `session` and `pageview` tables.
//!
//! Each session insert is followed by the inserts of its page views. Two
//! trailing statements move the id sequences past the ids used here so the
//! target database continues numbering after the imported rows.
//!
//! Values are single-quoted without escaping; inputs containing `'` produce
//! invalid SQL.

use std::io::Write;

use crate::render::{RenderError, RenderSummary};
use crate::report::DayReport;
use crate::synthesis::{PageView, Session, SessionUuidSource, Synthesis, SynthesisOptions, synthesize};

pub const SESSION_SEQUENCE: &str = "session_session_id_seq";
pub const PAGEVIEW_SEQUENCE: &str = "pageview_view_id_seq";

/// Synthesizes visits for `report` and writes one SQL statement per line.
pub fn write_sql<W, U>(
    report: &DayReport,
    options: &SynthesisOptions,
    uuids: &mut U,
    writer: &mut W,
) -> Result<RenderSummary, RenderError>
where
    W: Write + ?Sized,
    U: SessionUuidSource + ?Sized,
{
    let synthesis = synthesize(report, options, uuids)?;
    for statement in statements(&synthesis) {
        writeln!(writer, "{statement}")?;
    }
    writer.flush()?;

    Ok(RenderSummary {
        rows: report.values().map(Vec::len).sum(),
        sessions: synthesis.session_count(),
        page_views: synthesis.page_view_count(),
    })
}

/// All statements for a synthesis run, in output order.
pub fn statements(synthesis: &Synthesis) -> Vec<String> {
    let mut out = Vec::with_capacity(synthesis.session_count() + synthesis.page_view_count() + 2);
    for visit in &synthesis.visits {
        out.push(session_insert(&visit.session));
        out.extend(visit.page_views.iter().map(page_view_insert));
    }
    out.push(sequence_reset(PAGEVIEW_SEQUENCE, synthesis.next_page_view_id));
    out.push(sequence_reset(SESSION_SEQUENCE, synthesis.next_session_id));
    out
}

/// Session insert; `country` is not recoverable from the aggregate and is
/// always `NULL`.
pub fn session_insert(session: &Session) -> String {
    format!(
        "INSERT INTO session (session_id, session_uuid, website_id, created_at, hostname, browser, os, device, screen, language, country) \
         VALUES ({}, '{}', {}, '{}', '{}', '{}', '{}', '{}', '{}', '{}', NULL);",
        session.session_id,
        session.session_uuid,
        session.website_id,
        session.created_at,
        session.hostname,
        session.browser,
        session.os,
        session.device,
        session.screen,
        session.language,
    )
}

pub fn page_view_insert(view: &PageView) -> String {
    format!(
        "INSERT INTO pageview (view_id, website_id, session_id, created_at, url, referrer) \
         VALUES ({}, {}, {}, '{}', '{}', '{}');",
        view.id, view.website_id, view.session_id, view.created_at, view.url, view.referrer,
    )
}

/// Sets `sequence` so its current value is `value`, marked as consumed.
pub fn sequence_reset(sequence: &str, value: u64) -> String {
    format!("SELECT pg_catalog.setval('{sequence}', {value}, true);")
}
