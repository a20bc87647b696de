//! CLI subcommand implementations.

pub mod days;
pub mod migrate;
pub mod setup;
