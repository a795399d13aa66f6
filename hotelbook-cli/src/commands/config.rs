use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hotelbook_server::config::overlay_path;
use hotelbook_server::HostConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML (secrets masked)
    Show,
    /// Show the config file and overlay in use
    Path,
}

pub fn run_config(config_path: &Path, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Path => run_path(config_path),
    }
}

fn run_show(config_path: &Path) -> Result<()> {
    let config = super::load_config(config_path)?;
    print!("{}", render(&config)?);
    Ok(())
}

fn render(config: &HostConfig) -> Result<String> {
    toml::to_string_pretty(&config.redacted()).context("failed to serialize configuration")
}

fn run_path(config_path: &Path) -> Result<()> {
    let config = super::load_config(config_path)?;
    let base = resolve(config_path);

    if base.exists() {
        println!("{}", base.display());
    } else {
        println!("{} (not found, using defaults)", base.display());
    }

    let overlay = overlay_path(&base, config.environment);
    if overlay.exists() {
        println!("{}", overlay.display());
    }
    Ok(())
}

fn resolve(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_masks_secrets() {
        let mut config = HostConfig::default();
        config.auth.api_keys = vec!["s3cret".into()];
        config.database.connection_string = "postgres://app:hunter2@db/hotelbook".into();

        let out = render(&config).unwrap();
        assert!(!out.contains("s3cret"));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("postgres://app:***@db/hotelbook"));
        assert!(out.contains("[server]"));
    }

    #[test]
    fn rendered_config_loads_back() {
        let config = HostConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appsettings.toml");
        std::fs::write(&path, render(&config).unwrap()).unwrap();

        let loaded = HostConfig::load_with(&path, |_| None).unwrap();
        assert_eq!(loaded, config);
    }
}
