use std::io::stdout;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gax_cli::commands::{days, migrate, setup};
use gax_cli::{Cli, Commands, Config, default_config_file};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so command output can be piped
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Setup(args)) => {
            let path = match cli.config.clone() {
                Some(path) => path,
                None => default_config_file().context("could not determine config directory")?,
            };
            setup::run(&mut stdout().lock(), args, &path)?;
        }
        Some(Commands::Days {
            start_date,
            end_date,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            days::run(&mut stdout().lock(), &config, *start_date, *end_date)?;
        }
        Some(Commands::Migrate(args)) => {
            let config = load_config(cli.config.as_deref())?;
            let path = migrate::run(args, &config)?;
            println!("Output written to {}", path.display());
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
