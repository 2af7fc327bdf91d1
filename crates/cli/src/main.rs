//! Rollcall CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize config directory and default config
//! - `run`     — Start the bot on its enabled channels
//! - `status`  — Show configuration and store summary
//! - `doctor`  — Diagnose configuration and database health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "rollcall",
    about = "Rollcall — conversational attendance tracker",
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
    /// Initialize configuration
    Onboard,

    /// Start the bot and its channels
    Run {
        /// Chat over the terminal instead of the configured channels
        #[arg(long)]
        cli: bool,
    },

    /// Show configuration and store summary
    Status,

    /// Diagnose configuration and database health
    Doctor,
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
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Run { cli } => commands::run::run(cli).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
