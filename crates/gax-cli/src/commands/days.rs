//! Days command: the per-day request windows for a date range.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use gax_core::partition_days;

use crate::Config;

/// Resolves the range from flags or config and writes one JSON range per line.
///
/// Returns the number of days written.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<usize> {
    let start = start_date
        .or(config.start_date)
        .context("no start date; pass --start-date or run 'gax setup' first")?;
    let end = end_date
        .or(config.end_date)
        .context("no end date; pass --end-date or run 'gax setup' first")?;

    if start > end {
        anyhow::bail!("start date {start} is after end date {end}");
    }

    let days = partition_days(start, end);
    for day in &days {
        serde_json::to_writer(&mut *writer, day).context("failed to serialize day range")?;
        writeln!(writer)?;
    }
    tracing::debug!(%start, %end, days = days.len(), "partitioned date range");

    Ok(days.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_command_uses_configured_range() {
        let config = Config {
            start_date: Some(date(2022, 3, 30)),
            end_date: Some(date(2022, 4, 1)),
            ..Config::default()
        };
        let mut output = Vec::new();
        let count = run(&mut output, &config, None, None).unwrap();

        assert_eq!(count, 3);
        assert_snapshot!(String::from_utf8(output).unwrap(), @r#"
        {"start":"2022-03-30","end":"2022-03-30"}
        {"start":"2022-03-31","end":"2022-03-31"}
        {"start":"2022-04-01","end":"2022-04-01"}
        "#);
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            start_date: Some(date(2022, 1, 1)),
            end_date: Some(date(2022, 12, 31)),
            ..Config::default()
        };
        let mut output = Vec::new();
        let count = run(&mut output, &config, Some(date(2022, 6, 1)), Some(date(2022, 6, 1))).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let mut output: Vec<u8> = Vec::new();
        let err = run(
            &mut output,
            &Config::default(),
            Some(date(2022, 6, 2)),
            Some(date(2022, 6, 1)),
        )
        .unwrap_err();
        assert!(err.to_string().contains("after end date"));
        assert!(output.is_empty());
    }

    #[test]
    fn test_missing_range_is_an_error() {
        let err = run(&mut Vec::<u8>::new(), &Config::default(), None, None).unwrap_err();
        assert!(err.to_string().contains("no start date"));
    }
}
