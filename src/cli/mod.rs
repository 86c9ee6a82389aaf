//! Command-line interface definition and dispatch for kaze-catalog.
//!
//! Uses [`clap`] for argument parsing with derive macros. Every command reads
//! from a single [`ProviderRegistry`] built from the resolved settings.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kaze_catalog::catalog::ProviderRegistry;
use kaze_catalog::config::Settings;
use kaze_catalog::listing;

/// Top-level CLI structure for kaze-catalog.
#[derive(Parser)]
#[command(name = "kaze-catalog", about = "Inspect kaze's model provider catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
///
/// The `///` doc comments on variants double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// List available providers
    Providers {
        /// Print the provider list as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available models, grouped by provider
    Models {
        /// Only show models for this provider ID
        provider: Option<String>,
    },
    /// Show where the provider cache lives and whether it is fresh
    Cache,
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    let registry = ProviderRegistry::from_settings(&settings);

    match cli.command {
        Commands::Cache => {
            let cache = registry.cache();
            print!(
                "{}",
                listing::render_cache_status(cache.path(), cache.is_stale())
            );
            Ok(())
        }
        Commands::Providers { json } => {
            let providers = registry.get().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&*providers)?);
            } else {
                print!("{}", listing::render_providers(&providers));
            }
            registry.wait_for_refresh().await;
            Ok(())
        }
        Commands::Models { provider } => {
            let providers = registry.get().await?;
            print!(
                "{}",
                listing::render_models(&providers, provider.as_deref())?
            );
            registry.wait_for_refresh().await;
            Ok(())
        }
    }
}
