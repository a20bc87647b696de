//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::ValueEnum;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use gax_core::ZeroPageviewPolicy;
use serde::{Deserialize, Serialize};

/// Metrics requested from the reporting API, in `[pageviews, sessions]` order.
pub const DEFAULT_METRICS: &str = "ga:pageviews,ga:sessions";

/// Dimensions requested from the reporting API, in aggregate-row order.
pub const DEFAULT_DIMENSIONS: &str = "ga:pagePath,ga:browser,ga:operatingSystem,ga:deviceCategory,\
ga:browserSize,ga:language,ga:country,ga:fullReferrer";

/// Sampling level passed to the reporting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SamplingLevel {
    SamplingUnspecified,
    #[default]
    Default,
    Small,
    Large,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service account key used by the extractor.
    pub service_account_key_path: Option<PathBuf>,
    /// Reporting view (table) id.
    pub table_id: Option<u64>,
    pub metrics: String,
    pub dimensions: String,
    pub filters: String,
    pub sampling_level: SamplingLevel,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Directory for migration output when no explicit path is given.
    pub output_dir: PathBuf,
    /// Umami website id stamped onto synthesized records.
    pub website_id: u64,
    /// Hostname stamped onto synthesized sessions.
    pub hostname: String,
    pub zero_pageviews: ZeroPageviewPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_account_key_path: None,
            table_id: None,
            metrics: DEFAULT_METRICS.to_string(),
            dimensions: DEFAULT_DIMENSIONS.to_string(),
            filters: String::new(),
            sampling_level: SamplingLevel::default(),
            start_date: None,
            end_date: None,
            output_dir: dirs_data_path().unwrap_or_else(|| PathBuf::from(".")),
            website_id: 1,
            hostname: "localhost".to_string(),
            zero_pageviews: ZeroPageviewPolicy::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = default_config_file() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment overrides (GAX_*)
        figment = figment.merge(Env::prefixed("GAX_"));

        figment.extract()
    }
}

/// Returns the default config file, `<config dir>/gax/config.toml`.
pub fn default_config_file() -> Option<PathBuf> {
    dirs_config_path().map(|p| p.join("config.toml"))
}

/// Returns the platform-specific config directory for gax.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gax"))
}

/// Returns the platform-specific data directory for gax.
///
/// On Linux: `~/.local/share/gax`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("gax"))
}
