//! chatwhisk CLI — the main entry point.
//!
//! Commands:
//! - `validate` — Check a turn payload against a pipeline stage
//! - `invoke`   — Invoke a packaged action through OpenWhisk
//! - `config`   — Show, validate, or locate the configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "chatwhisk",
    about = "chatwhisk — serverless bot action helpers",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload (JSON file or stdin) for a stage
    Validate {
        /// INPUT, MIDDLEWARE, OUTPUT or STORE
        #[arg(short, long)]
        stage: String,

        /// Payload file; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Invoke an action in the configured package
    Invoke {
        /// Action name, without the package prefix
        action: String,

        /// Action parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,

        /// Fire and forget instead of waiting for the result
        #[arg(long)]
        no_wait: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Load and check the configuration
    Validate,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { stage, file } => commands::validate::run(&stage, file).await?,
        Commands::Invoke {
            action,
            params,
            no_wait,
        } => commands::invoke::run(&action, params.as_deref(), no_wait).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}
