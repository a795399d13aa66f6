//! hotelbook CLI - hosts the hotel booking HTTP API
//!
//! Subcommands:
//! - `serve`: run migrations and serve the API until Ctrl+C / SIGTERM
//! - `migrate`: apply the schema and exit
//! - `config show|path`: inspect the effective configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hotelbook_server::config::DEFAULT_CONFIG_FILE;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "hotelbook",
    author,
    version,
    about = "Hotel booking HTTP API: users, rooms, amenities, search and reservations"
)]
struct Cli {
    /// Path to the appsettings file (environment overlays are read next to it)
    #[arg(
        long,
        short = 'c',
        global = true,
        env = "HOTELBOOK_CONFIG",
        default_value = DEFAULT_CONFIG_FILE,
        value_name = "PATH"
    )]
    config: PathBuf,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (needs the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run migrations, then serve the HTTP API
    Serve(commands::serve::ServeArgs),
    /// Apply database migrations and exit
    Migrate,
    /// Inspect the effective configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env before anything reads the environment
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let flags = tracing_setup::Flags {
        debug: cli.debug,
        otel: cli.otel,
    };

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(&cli.config, flags, args).await,
        Commands::Migrate => commands::run_migrate(&cli.config, flags).await,
        Commands::Config(args) => commands::run_config(&cli.config, args),
    };

    tracing_setup::shutdown_otel();
    result
}
