//! `parcep lookup` implementation.
//!
//! Looks up every argument concurrently through the engine.

use std::time::Duration;

use clap::Args;
use parcep_client::{LookupEngine, LookupOptions};
use parcep_core::{LookupOutcome, PostalQuery, ProviderId};

use crate::error::CliError;

/// Arguments for `parcep lookup`.
#[derive(Debug, Clone, Args)]
pub struct LookupArgs {
    /// Postal codes to resolve, with or without separators.
    #[arg(required = true)]
    pub codes: Vec<String>,

    /// Skip reading and writing the cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Per-provider timeout in milliseconds (overrides configuration).
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Only query this provider (repeatable): brasilapi, viacep.
    #[arg(long = "provider", value_parser = parse_provider)]
    pub providers: Vec<ProviderId>,
}

fn parse_provider(s: &str) -> Result<ProviderId, String> {
    s.parse().map_err(|e: parcep_core::Error| e.to_string())
}

impl LookupArgs {
    /// Lookup options for these arguments, starting from the engine defaults.
    pub fn options(&self, defaults: &LookupOptions) -> Result<LookupOptions, CliError> {
        let mut options = defaults.clone();

        if let Some(ms) = self.timeout_ms {
            if ms == 0 {
                return Err(CliError::InvalidInput("timeout_ms must be greater than 0".into()));
            }
            options.timeout = Some(Duration::from_millis(ms));
        }

        if !self.providers.is_empty() {
            options.providers = Some(self.providers.clone());
        }

        if self.no_cache {
            options.use_cache = false;
        }

        Ok(options)
    }
}

/// Implementation of the lookup command.
pub async fn lookup_impl(engine: &LookupEngine, args: &LookupArgs) -> Result<Vec<LookupOutcome>, CliError> {
    let options = args.options(engine.defaults())?;
    let queries: Vec<PostalQuery> = args.codes.iter().map(|c| PostalQuery::from(c.as_str())).collect();

    Ok(engine.lookup_many_with(&queries, &options).await)
}

/// One `input: message` line per failed outcome, in input order.
pub fn failure_messages(codes: &[String], outcomes: &[LookupOutcome]) -> Vec<String> {
    codes
        .iter()
        .zip(outcomes)
        .filter_map(|(code, outcome)| outcome.reason().map(|reason| format!("{code}: {}", reason.message())))
        .collect()
}
