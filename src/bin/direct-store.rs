//! direct-store CLI Binary
//!
//! Inspects the facade layout of a module shape file.

use anyhow::{Context, Result};
use clap::Parser;
use direct_store::cli::{map_error, Cli, RunContext};
use direct_store::config::ConfigLoader;
use direct_store::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let logging_config = build_logging_config(cli);
    init_logging(Some(&logging_config)).context("Failed to initialize logging")?;

    info!("direct-store CLI starting");

    let context = RunContext::new(cli.config.clone()).context("Failed to load configuration")?;

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            Err(anyhow::anyhow!(map_error(&e)))
        }
    }
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path),
        None => ConfigLoader::load(),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }

    config
}
