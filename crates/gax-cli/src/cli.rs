//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::commands::migrate::MigrateArgs;
use crate::commands::setup::SetupArgs;

/// Google Analytics extractor.
///
/// Turns day-level analytics aggregates into Umami sessions and page views,
/// or into flat CSV and raw JSON exports.
#[derive(Debug, Parser)]
#[command(name = "gax", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write extraction settings to the config file.
    Setup(SetupArgs),

    /// Print the single-day ranges covering the configured period.
    Days {
        /// First day (YYYY-MM-DD); defaults to the configured start date.
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD); defaults to the configured end date.
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },

    /// Convert an extracted report into Umami SQL, CSV or JSON.
    Migrate(MigrateArgs),
}
