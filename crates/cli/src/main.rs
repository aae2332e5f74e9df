//! parcep command-line entry point.
//!
//! Prints one JSON document per line on stdout. Logging goes to stderr so the
//! output stays machine-readable.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use parcep_client::LookupEngine;
use parcep_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::{LookupArgs, ValidateArgs};

/// Brazilian postal code (CEP) lookup.
#[derive(Debug, Parser)]
#[command(name = "parcep", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve postal codes to addresses.
    Lookup(LookupArgs),
    /// Check postal code format without any lookup.
    Validate(ValidateArgs),
    /// Delete expired cache entries.
    Purge,
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => {
            let outputs = commands::validate::validate_impl(&args);
            print_lines(&commands::to_json_lines(&outputs)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Lookup(args) => {
            let engine = build_engine().await?;
            let outcomes = commands::lookup::lookup_impl(&engine, &args).await?;
            print_lines(&commands::to_json_lines(&outcomes)?);
            for message in commands::lookup::failure_messages(&args.codes, &outcomes) {
                eprintln!("{message}");
            }
            if outcomes.iter().all(|o| o.is_ok()) { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::FAILURE) }
        }
        Command::Purge => {
            let engine = build_engine().await?;
            let output = commands::purge::purge_impl(engine.cache()).await?;
            print_lines(&commands::to_json_lines(&[output])?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn build_engine() -> Result<LookupEngine> {
    let config = AppConfig::load()?;
    tracing::info!(providers = ?config.providers, db_path = ?config.db_path, "starting parcep");
    Ok(LookupEngine::from_config(&config).await?)
}
