//! Entry point for kaze-catalog, the provider catalog inspector for kaze.
//!
//! This binary loads environment variables, installs logging, parses CLI
//! arguments via [`cli`], and dispatches to the appropriate subcommand handler.

mod cli;

use anyhow::Result;
use kaze_catalog::constants::LOG_ENV;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Runs the kaze-catalog CLI.
///
/// Loads `.env` files (silently ignored if absent), sets up `tracing` with the
/// filter in `KAZE_LOG` (warnings only by default), parses command-line
/// arguments into a [`cli::Cli`] struct, and dispatches via [`cli::run`].
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = cli::parse();
    cli::run(cli).await
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
