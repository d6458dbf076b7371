mod commands;

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use clap::Parser;
use satchel_core::{
    config::{self, AppConfig},
    Catalog, PlayerFile,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::commands::Command;

/// Inspect and edit a player's item collection.
#[derive(Debug, Parser)]
#[command(name = "satchel", version)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => {
            config::ensure_default_config()?;
            AppConfig::load()?
        }
    };

    let catalog = Arc::new(Catalog::from_path(&config.catalog_path)?);
    let mut player = PlayerFile::load_or_default(&config.player_path)?;
    let mut inventory = player.to_inventory(catalog)?;

    let mut stdout = std::io::stdout().lock();
    let mutated = commands::run(cli.command, &mut inventory, &mut stdout)?;

    if mutated && config.autosave {
        player.set_items(&inventory);
        player.store(&config.player_path)?;
        info!("saved inventory to {}", config.player_path.display());
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("satchel.log"))?;

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
