#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod args;
pub mod commands;
pub mod config;
pub mod seed;

use crate::args::{Cli, Command};
use crate::config::load_config;
use anyhow::{Context, Result};
use clap::Parser;
use tome_logger::{LevelFilter, Logger};
use tome_store::{CollectionStore, TracingSink};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    if let Some(root) = cli.root {
        config.store.root = root;
    }

    let level: LevelFilter = config
        .log
        .level
        .parse()
        .with_context(|| format!("Invalid log level: {}", config.log.level))?;

    let mut logger = Logger::builder().name("tome").level(level).json(config.log.json);
    if let Some(dir) = &config.log.dir {
        logger = logger.path(dir);
    }
    let _logger = logger.init()?;

    let store = CollectionStore::builder()
        .root(&config.store.root)
        .sink(TracingSink::new(level))
        .purge_orphans(config.store.purge_orphans)
        .open()
        .await
        .with_context(|| format!("Failed to open store at {}", config.store.root.display()))?;

    match cli.command {
        Command::Write { collection, resource, json } => {
            commands::write(&store, &collection, &resource, &json).await?;
        },
        Command::Read { collection, resource } => {
            commands::read(&store, &collection, &resource).await?;
        },
        Command::ReadAll { collection } => commands::read_all(&store, &collection).await?,
        Command::Delete { collection, resource } => {
            commands::delete(&store, &collection, &resource).await?;
        },
        Command::Collections {} => commands::collections(&store).await?,
        Command::Purge {} => commands::purge(&store).await?,
        Command::Seed {} => commands::seed(&store).await?,
    }

    Ok(())
}
