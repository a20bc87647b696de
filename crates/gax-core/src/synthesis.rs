//! Synthesis of per-visit records from daily aggregates.
//!
//! Daily aggregates only carry totals, so individual visits are invented to
//! reproduce them exactly: every aggregate row becomes `max(sessions, 1)`
//! sessions whose page views sum to the row's pageview count.
//!
//! # Allocation policy
//!
//! With `P` pageviews and `S` sessions (zero sessions counts as one):
//!
//! 1. `P == S`: every session gets one page view.
//! 2. `P % S == 0`: every session gets `P / S` page views.
//! 3. Otherwise the first `S - 1` sessions get one page view each and the
//!    last session takes the remaining `P - (S - 1)`.
//!
//! This is an approximation. Visit boundaries, time of day and bounce
//! behaviour cannot be recovered from day-level totals; only the per-row
//! session and pageview counts are preserved.

use chrono::NaiveDate;
use url::{Host, Url};
use uuid::Uuid;

use crate::report::{AggregateRow, DayReport, RowError};
use crate::types::ZeroPageviewPolicy;

/// Time-of-day appended to every synthesized timestamp.
pub const MIDNIGHT_SUFFIX: &str = " 00:00:00.000+00";

/// Column width of `session.browser` in the target schema.
pub const BROWSER_MAX_CHARS: usize = 20;

/// Placeholder some providers report instead of a search referrer URL.
const GOOGLE_PLACEHOLDER: &str = "google";
const GOOGLE_REFERRER: &str = "https://google.com";

/// Source of session UUIDs.
///
/// Production code uses [`RandomUuids`]; tests pass a closure yielding a
/// fixed sequence so output is reproducible.
pub trait SessionUuidSource {
    fn next_uuid(&mut self) -> Uuid;
}

/// Random (v4) session UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUuids;

impl SessionUuidSource for RandomUuids {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

impl<F: FnMut() -> Uuid> SessionUuidSource for F {
    fn next_uuid(&mut self) -> Uuid {
        self()
    }
}

/// Hands out session and page view ids for one synthesis run.
///
/// Both counters start at 1 and only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next_session_id: u64,
    next_page_view_id: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_session_id: 1,
            next_page_view_id: 1,
        }
    }

    /// The id the next session will receive.
    pub const fn next_session_id(&self) -> u64 {
        self.next_session_id
    }

    /// The id the next page view will receive.
    pub const fn next_page_view_id(&self) -> u64 {
        self.next_page_view_id
    }

    const fn take_session_id(&mut self) -> u64 {
        let id = self.next_session_id;
        self.next_session_id += 1;
        id
    }

    const fn take_page_view_id(&mut self) -> u64 {
        let id = self.next_page_view_id;
        self.next_page_view_id += 1;
        id
    }
}

/// Site-level values stamped onto every synthesized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    pub website_id: u64,
    pub hostname: String,
    pub zero_pageviews: ZeroPageviewPolicy,
}

impl SynthesisOptions {
    pub fn new(website_id: u64, hostname: impl Into<String>) -> Self {
        Self {
            website_id,
            hostname: hostname.into(),
            zero_pageviews: ZeroPageviewPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_zero_pageviews(mut self, policy: ZeroPageviewPolicy) -> Self {
        self.zero_pageviews = policy;
        self
    }
}

/// A synthesized visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: u64,
    pub session_uuid: Uuid,
    pub website_id: u64,
    pub created_at: String,
    pub hostname: String,
    pub browser: String,
    pub os: String,
    pub device: String,
    pub screen: String,
    pub language: String,
}

/// A synthesized page view belonging to one [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub id: u64,
    pub website_id: u64,
    pub session_id: u64,
    pub created_at: String,
    pub url: String,
    pub referrer: String,
}

/// A session together with the page views attributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub session: Session,
    pub page_views: Vec<PageView>,
}

/// Output of a synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// Visits in emission order.
    pub visits: Vec<Visit>,
    /// First session id not handed out.
    pub next_session_id: u64,
    /// First page view id not handed out.
    pub next_page_view_id: u64,
}

impl Synthesis {
    pub fn session_count(&self) -> usize {
        self.visits.len()
    }

    pub fn page_view_count(&self) -> usize {
        self.visits.iter().map(|v| v.page_views.len()).sum()
    }
}

/// How an aggregate's pageviews are spread over its sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// One page view per session.
    Equal { sessions: u64 },
    /// The same number of page views in every session.
    EvenSplit { sessions: u64, views_per_session: u64 },
    /// One page view per session except the last, which takes the rest.
    Remainder { sessions: u64, last_session_views: u64 },
}

impl Allocation {
    /// Picks the allocation for `pageviews` over `sessions` (zero counts as one).
    pub const fn of(pageviews: u64, sessions: u64) -> Self {
        let sessions = if sessions == 0 { 1 } else { sessions };
        if pageviews == sessions {
            Self::Equal { sessions }
        } else if pageviews % sessions == 0 {
            Self::EvenSplit {
                sessions,
                views_per_session: pageviews / sessions,
            }
        } else {
            // Saturates only for rows reporting fewer pageviews than sessions.
            Self::Remainder {
                sessions,
                last_session_views: pageviews.saturating_sub(sessions - 1),
            }
        }
    }

    /// Number of sessions to emit.
    pub const fn sessions(&self) -> u64 {
        match *self {
            Self::Equal { sessions }
            | Self::EvenSplit { sessions, .. }
            | Self::Remainder { sessions, .. } => sessions,
        }
    }

    /// Page views for the session at `index` (zero-based).
    pub const fn views_for(&self, index: u64) -> u64 {
        match *self {
            Self::Equal { .. } => 1,
            Self::EvenSplit {
                views_per_session, ..
            } => views_per_session,
            Self::Remainder {
                sessions,
                last_session_views,
            } => {
                if index + 1 == sessions {
                    last_session_views
                } else {
                    1
                }
            }
        }
    }
}

/// Turns a raw referrer dimension into a referrer URL.
///
/// The `google` placeholder maps to `https://google.com`; anything else is
/// prefixed with `https://` and kept only if the result is a valid URL.
pub fn derive_referrer(raw: &str) -> String {
    if raw == GOOGLE_PLACEHOLDER {
        return GOOGLE_REFERRER.to_string();
    }
    let candidate = format!("https://{raw}");
    if is_valid_url(&candidate) {
        candidate
    } else {
        String::new()
    }
}

/// Two-letter language code, e.g. `en-us` -> `en`.
pub fn derive_language(raw: &str) -> String {
    raw.chars().take(2).collect()
}

/// Timestamp used for every record of `date`.
pub fn midnight_timestamp(date: NaiveDate) -> String {
    format!("{date}{MIDNIGHT_SUFFIX}")
}

fn is_valid_url(candidate: &str) -> bool {
    let Ok(parsed) = Url::parse(candidate) else {
        return false;
    };
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return false;
    }
    match parsed.host() {
        Some(Host::Domain(domain)) => is_valid_domain(domain),
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        None => false,
    }
}

fn is_valid_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = domain.split('.').collect();
    let Some(tld) = labels.last() else {
        return false;
    };
    let tld_ok = tld.len() >= 2
        && (tld.bytes().all(|b| b.is_ascii_alphabetic()) || tld.starts_with("xn--"));

    labels.len() >= 2 && tld_ok && labels.iter().all(|label| is_valid_label(label))
}

fn is_valid_label(label: &str) -> bool {
    (1..=63).contains(&label.len())
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Synthesizes the visits for one aggregate row, drawing ids from `ids`.
pub fn synthesize_row<U: SessionUuidSource + ?Sized>(
    row: &AggregateRow,
    options: &SynthesisOptions,
    ids: &mut IdAllocator,
    uuids: &mut U,
) -> Vec<Visit> {
    let dims = &row.dimensions;

    if row.pageviews == 0 && options.zero_pageviews == ZeroPageviewPolicy::Skip {
        tracing::warn!(
            date = %row.date,
            path = %dims.path,
            "skipping aggregate row with zero pageviews"
        );
        return Vec::new();
    }
    if row.pageviews != 0 && row.pageviews < row.effective_sessions() {
        tracing::warn!(
            date = %row.date,
            path = %dims.path,
            pageviews = row.pageviews,
            sessions = row.sessions,
            "aggregate row has fewer pageviews than sessions"
        );
    }

    let allocation = Allocation::of(row.pageviews, row.sessions);
    let created_at = midnight_timestamp(row.date);
    let referrer = derive_referrer(&dims.referrer);
    let language = derive_language(&dims.language);
    let browser: String = dims.browser.chars().take(BROWSER_MAX_CHARS).collect();

    let mut visits = Vec::new();
    for index in 0..allocation.sessions() {
        let session_id = ids.take_session_id();
        let session = Session {
            session_id,
            session_uuid: uuids.next_uuid(),
            website_id: options.website_id,
            created_at: created_at.clone(),
            hostname: options.hostname.clone(),
            browser: browser.clone(),
            os: dims.os.clone(),
            device: dims.device.clone(),
            screen: dims.screen.clone(),
            language: language.clone(),
        };

        let page_views = (0..allocation.views_for(index))
            .map(|_| PageView {
                id: ids.take_page_view_id(),
                website_id: options.website_id,
                session_id,
                created_at: created_at.clone(),
                url: dims.path.clone(),
                referrer: referrer.clone(),
            })
            .collect();

        visits.push(Visit {
            session,
            page_views,
        });
    }
    visits
}

/// Synthesizes visits for a whole report, days ascending and rows in order.
///
/// Ids are allocated fresh for each call, starting at 1.
pub fn synthesize<U: SessionUuidSource + ?Sized>(
    report: &DayReport,
    options: &SynthesisOptions,
    uuids: &mut U,
) -> Result<Synthesis, RowError> {
    let mut ids = IdAllocator::new();
    let mut visits = Vec::new();

    for (date, rows) in report {
        let first_visit = visits.len();
        let first_page_view = ids.next_page_view_id();

        for row in rows {
            let row = AggregateRow::from_report_row(*date, row)?;
            visits.extend(synthesize_row(&row, options, &mut ids, uuids));
        }

        tracing::debug!(
            %date,
            rows = rows.len(),
            sessions = visits.len() - first_visit,
            page_views = ids.next_page_view_id() - first_page_view,
            "synthesized day"
        );
    }

    Ok(Synthesis {
        visits,
        next_session_id: ids.next_session_id(),
        next_page_view_id: ids.next_page_view_id(),
    })
}
