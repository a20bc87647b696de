//! Day-granularity aggregate rows as returned by the reporting API.
//!
//! The extraction layer hands over a [`DayReport`]: one list of rows per
//! calendar day, each row carrying the eight dimension strings and the
//! pageview/session metrics as decimal strings.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of dimensions every aggregate row must carry.
pub const DIMENSION_COUNT: usize = 8;

/// Rows grouped by calendar day, iterated in ascending day order.
pub type DayReport = BTreeMap<NaiveDate, Vec<ReportRow>>;

/// Errors raised while reading an aggregate row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The row did not carry exactly [`DIMENSION_COUNT`] dimensions.
    #[error("expected 8 dimensions on {date}, got {found}")]
    DimensionCount { date: NaiveDate, found: usize },

    /// The row had no metric block.
    #[error("row on {date} has no metrics")]
    MissingMetrics { date: NaiveDate },

    /// A metric value was absent.
    #[error("row on {date} is missing the {metric} value")]
    MissingValue {
        date: NaiveDate,
        metric: &'static str,
    },

    /// A metric value was not a non-negative integer.
    #[error("invalid {metric} value on {date}: {value:?}")]
    InvalidValue {
        date: NaiveDate,
        metric: &'static str,
        value: String,
    },
}

/// One row of the reporting API response, kept in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub dimensions: Vec<String>,
    pub metrics: Vec<MetricValues>,
    /// Fields this tool does not interpret, preserved for passthrough.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ReportRow {
    /// Builds a row from dimension values and raw metric strings.
    pub fn new<D, V>(dimensions: D, values: V) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            dimensions: dimensions.into_iter().map(Into::into).collect(),
            metrics: vec![MetricValues {
                values: values.into_iter().map(Into::into).collect(),
                extra: serde_json::Map::new(),
            }],
            extra: serde_json::Map::new(),
        }
    }
}

/// A metric block; `values` are ordered `[pageviews, sessions]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricValues {
    pub values: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The eight positional dimensions of an aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub path: String,
    pub browser: String,
    pub os: String,
    pub device: String,
    pub screen: String,
    pub language: String,
    pub country: String,
    pub referrer: String,
}

/// A parsed aggregate: totals for one dimension combination on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRow {
    pub date: NaiveDate,
    pub dimensions: Dimensions,
    pub pageviews: u64,
    pub sessions: u64,
}

impl AggregateRow {
    /// Parses a wire row for the given day.
    ///
    /// `pageviews >= sessions` is not checked here.
    pub fn from_report_row(date: NaiveDate, row: &ReportRow) -> Result<Self, RowError> {
        let [path, browser, os, device, screen, language, country, referrer] =
            <&[String; DIMENSION_COUNT]>::try_from(row.dimensions.as_slice()).map_err(|_| {
                RowError::DimensionCount {
                    date,
                    found: row.dimensions.len(),
                }
            })?;

        let metrics = row
            .metrics
            .first()
            .ok_or(RowError::MissingMetrics { date })?;

        Ok(Self {
            date,
            dimensions: Dimensions {
                path: path.clone(),
                browser: browser.clone(),
                os: os.clone(),
                device: device.clone(),
                screen: screen.clone(),
                language: language.clone(),
                country: country.clone(),
                referrer: referrer.clone(),
            },
            pageviews: parse_metric(date, metrics, 0, "pageviews")?,
            sessions: parse_metric(date, metrics, 1, "sessions")?,
        })
    }

    /// Session count used for allocation; zero is treated as one visit.
    pub fn effective_sessions(&self) -> u64 {
        self.sessions.max(1)
    }
}

fn parse_metric(
    date: NaiveDate,
    metrics: &MetricValues,
    index: usize,
    metric: &'static str,
) -> Result<u64, RowError> {
    let raw = metrics
        .values
        .get(index)
        .ok_or(RowError::MissingValue { date, metric })?;
    raw.trim().parse().map_err(|_| RowError::InvalidValue {
        date,
        metric,
        value: raw.clone(),
    })
}

/// Parses every row of a report, in day order then row order.
pub fn aggregate_rows(report: &DayReport) -> Result<Vec<AggregateRow>, RowError> {
    report
        .iter()
        .flat_map(|(date, rows)| {
            rows.iter()
                .map(move |row| AggregateRow::from_report_row(*date, row))
        })
        .collect()
}
