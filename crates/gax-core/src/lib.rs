//! Core logic for migrating day-level analytics aggregates.
//!
//! This crate contains:
//! - Report model: the per-day aggregate rows handed over by the extractor
//! - Partitioning: splitting a date range into single-day request windows
//! - Synthesis: inventing sessions and page views that reproduce the totals
//! - Rendering: Umami SQL, flat CSV and raw JSON output

pub mod partition;
pub mod render;
pub mod report;
pub mod synthesis;
pub mod types;

pub use partition::{DayRange, partition_days};
pub use render::{RenderError, RenderSummary, render};
pub use report::{AggregateRow, DayReport, Dimensions, MetricValues, ReportRow, RowError};
pub use synthesis::{
    Allocation, IdAllocator, PageView, RandomUuids, Session, SessionUuidSource, Synthesis,
    SynthesisOptions, Visit, synthesize,
};
pub use types::{OutputFormat, ValidationError, ZeroPageviewPolicy};
