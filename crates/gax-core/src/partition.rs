//! Splitting a date range into single-day request windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive date window; produced here always with `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Returns one range per day from `start` to `end` inclusive, ascending.
///
/// An inverted range (`start > end`) yields no days.
pub fn partition_days(start: NaiveDate, end: NaiveDate) -> Vec<DayRange> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| DayRange {
            start: day,
            end: day,
        })
        .collect()
}
