//! Setup command: persists extraction settings to the config file.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use crate::config::SamplingLevel;

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Comma-separated reporting metrics.
    #[arg(long)]
    pub metrics: String,

    /// Comma-separated reporting dimensions.
    #[arg(long)]
    pub dimensions: String,

    /// Path to the service account key file.
    #[arg(long)]
    pub sa_key_path: PathBuf,

    /// Reporting view (table) id.
    #[arg(long)]
    pub table_id: u64,

    /// Reporting API filter expression.
    #[arg(long)]
    pub filters: Option<String>,

    #[arg(long, value_enum, default_value_t = SamplingLevel::Default)]
    pub sampling_level: SamplingLevel,

    /// First day to extract (YYYY-MM-DD).
    #[arg(long)]
    pub start_date: NaiveDate,

    /// Last day to extract (YYYY-MM-DD).
    #[arg(long)]
    pub end_date: NaiveDate,

    /// Print the configuration instead of writing it.
    #[arg(long)]
    pub dry_run: bool,
}

/// The settings written by `gax setup`; a subset of [`crate::Config`].
#[derive(Debug, Serialize)]
struct SetupFile<'a> {
    service_account_key_path: &'a Path,
    table_id: u64,
    metrics: &'a str,
    dimensions: &'a str,
    filters: &'a str,
    sampling_level: SamplingLevel,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl<'a> From<&'a SetupArgs> for SetupFile<'a> {
    fn from(args: &'a SetupArgs) -> Self {
        Self {
            service_account_key_path: &args.sa_key_path,
            table_id: args.table_id,
            metrics: &args.metrics,
            dimensions: &args.dimensions,
            filters: args.filters.as_deref().unwrap_or_default(),
            sampling_level: args.sampling_level,
            start_date: args.start_date,
            end_date: args.end_date,
        }
    }
}

/// Runs the setup command, writing to `config_path` unless `--dry-run`.
pub fn run<W: Write>(writer: &mut W, args: &SetupArgs, config_path: &Path) -> Result<()> {
    if args.start_date > args.end_date {
        anyhow::bail!(
            "start date {} is after end date {}",
            args.start_date,
            args.end_date
        );
    }

    let content =
        toml::to_string_pretty(&SetupFile::from(args)).context("failed to serialize config")?;

    if args.dry_run {
        write!(writer, "{content}")?;
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    std::fs::write(config_path, content)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    tracing::info!(path = %config_path.display(), "configuration saved");

    writeln!(writer, "Config written to {}", config_path.display())?;
    Ok(())
}
