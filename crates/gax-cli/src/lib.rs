//! Google Analytics extractor CLI library.
//!
//! This crate provides the CLI interface for gax.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{Config, SamplingLevel, default_config_file};
