//! Migrate command: renders an extracted report as Umami SQL, CSV or JSON.
//!
//! The input is the day-to-rows JSON written by the extractor:
//! `{"YYYY-MM-DD": [{"dimensions": [...], "metrics": [{"values": [...]}]}]}`.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use gax_core::{DayReport, OutputFormat, RandomUuids, SynthesisOptions, ZeroPageviewPolicy, render};
use uuid::Uuid;

use crate::Config;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Extracted report to read, or `-` for stdin.
    #[arg(long, short)]
    pub input: PathBuf,

    /// Output format: umami, csv or json.
    #[arg(long, short, default_value_t = OutputFormat::Umami)]
    pub format: OutputFormat,

    /// Umami website id (defaults to the configured one).
    #[arg(long)]
    pub website_id: Option<u64>,

    /// Hostname for synthesized sessions (defaults to the configured one).
    #[arg(long)]
    pub hostname: Option<String>,

    /// Output file; defaults to a fresh file in the configured output directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Handling of rows reporting zero pageviews: skip or empty-sessions.
    #[arg(long)]
    pub zero_pageviews: Option<ZeroPageviewPolicy>,
}

/// Runs the migrate command and returns the path written.
pub fn run(args: &MigrateArgs, config: &Config) -> Result<PathBuf> {
    let mut report = read_report(&args.input)?;
    // JSON output reproduces the input, empty days included.
    if args.format != OutputFormat::Json {
        drop_empty_days(&mut report);
    }

    let options = SynthesisOptions::new(
        args.website_id.unwrap_or(config.website_id),
        args.hostname.as_deref().unwrap_or(&config.hostname),
    )
    .with_zero_pageviews(args.zero_pageviews.unwrap_or(config.zero_pageviews));

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&config.output_dir, args.format));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let summary = render(args.format, &report, &options, &mut RandomUuids, &mut writer)
        .with_context(|| format!("failed to render {} output", args.format))?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(
        format = %args.format,
        path = %path.display(),
        days = report.len(),
        rows = summary.rows,
        sessions = summary.sessions,
        page_views = summary.page_views,
        "migration written"
    );
    Ok(path)
}

/// `<dir>/<random id>_extract.<ext>`, unique across repeated runs.
pub fn default_output_path(dir: &Path, format: OutputFormat) -> PathBuf {
    dir.join(format!("{}_extract.{}", Uuid::new_v4(), format.extension()))
}

fn read_report(input: &Path) -> Result<DayReport> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read report from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };
    parse_report(&content)
}

fn parse_report(content: &str) -> Result<DayReport> {
    serde_json::from_str(content).context("invalid report JSON")
}

fn drop_empty_days(report: &mut DayReport) {
    report.retain(|day, rows| {
        if rows.is_empty() {
            tracing::debug!(%day, "skipping day without rows");
        }
        !rows.is_empty()
    });
}
