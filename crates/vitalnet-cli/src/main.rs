//! VitalNet command line client.
//!
//! ```text
//! vitalnet auth   --card 4111111111111111 --expiration 1228 --amount 10.99
//! vitalnet settle --card 4111111111111111 --sequence 0001 --amount 10.99 \
//!                 --from-response auth.bin
//! vitalnet parse  response.bin
//! ```
//!
//! Environment:
//! - `VITALNET_CONFIG`: configuration file (default `vitalnet.json`)
//! - `VITALNET_URL`: gateway URL override
//! - `RUST_LOG`: log filter, takes precedence over `--verbose`

mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{auth::AuthArgs, parse::ParseArgs, settle::SettleArgs};
use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "vitalnet", version)]
#[command(about = "Card authorization and settlement over the VitalNet host")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, short, env = "VITALNET_CONFIG", default_value = "vitalnet.json", global = true)]
    config: PathBuf,

    /// Gateway URL, overrides the configuration file
    #[arg(long, env = "VITALNET_URL", global = true)]
    url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authorize a card-not-present purchase
    Auth(AuthArgs),
    /// Settle one authorized card in a single-item batch
    Settle(SettleArgs),
    /// Decode a saved raw response and print it as JSON
    Parse(ParseArgs),
}

fn load_config(path: &Path, url: Option<String>) -> anyhow::Result<Config> {
    let config =
        Config::load(path).with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(config.with_url(url))
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(version = vitalnet_core::VERSION, "Starting");

    match cli.command {
        Command::Auth(args) => {
            let config = load_config(&cli.config, cli.url)?;
            commands::auth::run(args, config).await
        }
        Command::Settle(args) => {
            let config = load_config(&cli.config, cli.url)?;
            commands::settle::run(args, config).await
        }
        Command::Parse(args) => commands::parse::run(args),
    }
}
