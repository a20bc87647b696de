//! Closed option sets shared by the synthesizer, renderers and CLI.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for option values read from flags or configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Unknown output format name.
    #[error("invalid output format: {value} (expected umami, csv or json)")]
    InvalidOutputFormat { value: String },

    /// Unknown zero-pageview policy name.
    #[error("invalid zero-pageview policy: {value} (expected skip or empty-sessions)")]
    InvalidZeroPageviewPolicy { value: String },
}

/// Target format for a migration run.
///
/// This enum encodes the valid output formats, preventing invalid string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// SQL inserts for the Umami `session`/`pageview` tables.
    #[default]
    Umami,
    /// One flat line per aggregate row.
    Csv,
    /// The raw report, unchanged.
    Json,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Umami => "umami",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// File extension for output written in this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Umami => "sql",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "umami" => Ok(Self::Umami),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ValidationError::InvalidOutputFormat {
                value: s.to_string(),
            }),
        }
    }
}

/// What to do with an aggregate row that reports zero pageviews.
///
/// The extraction layer normally drops such rows. When one does reach the
/// synthesizer its sessions are still emitted, each without page views,
/// unless skipping is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroPageviewPolicy {
    /// Emit nothing for the row.
    Skip,
    /// Emit the row's `max(sessions, 1)` sessions, each with no page views.
    #[default]
    EmptySessions,
}

impl ZeroPageviewPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::EmptySessions => "empty-sessions",
        }
    }
}

impl fmt::Display for ZeroPageviewPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ZeroPageviewPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "empty-sessions" => Ok(Self::EmptySessions),
            _ => Err(ValidationError::InvalidZeroPageviewPolicy {
                value: s.to_string(),
            }),
        }
    }
}
