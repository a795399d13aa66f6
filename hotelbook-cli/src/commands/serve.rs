//! HTTP server command
//!
//! Loads configuration, runs migrations and serves until shutdown.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use hotelbook_server::db::migrations;
use hotelbook_server::{run_server, ConnectionFactory};

use crate::tracing_setup::{self, Flags};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides [server].bind and HOTELBOOK_BIND)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Skip migrations at startup
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Run the HTTP server
pub async fn run_serve(config_path: &Path, flags: Flags, args: ServeArgs) -> Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    tracing_setup::init(flags, &config.logging)?;
    tracing::info!(
        environment = %config.environment,
        bind = %config.server.bind,
        "starting hotelbook"
    );

    let db = ConnectionFactory::connect_eager(&config.database)
        .await
        .context("failed to connect to the database")?;

    if args.skip_migrations {
        tracing::warn!("skipping migrations");
    } else {
        migrations::run(db.pool())
            .await
            .context("failed to apply migrations")?;
    }

    // Blocks until shutdown
    run_server(db, config).await.context("server error")?;

    Ok(())
}
