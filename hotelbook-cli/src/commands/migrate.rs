//! Apply the schema without serving

use std::path::Path;

use anyhow::{Context, Result};
use hotelbook_server::db::migrations;
use hotelbook_server::ConnectionFactory;

use crate::tracing_setup::{self, Flags};

pub async fn run_migrate(config_path: &Path, flags: Flags) -> Result<()> {
    let config = super::load_config(config_path)?;
    tracing_setup::init(flags, &config.logging)?;

    let db = ConnectionFactory::connect_eager(&config.database)
        .await
        .context("failed to connect to the database")?;

    migrations::run(db.pool())
        .await
        .context("failed to apply migrations")?;

    db.close().await;
    tracing::info!(environment = %config.environment, "migrations complete");
    Ok(())
}
