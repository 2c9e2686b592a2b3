//! rbenefits library root.
//! Exposes the CLI parser, the high-level run() function and the internal
//! modules (slot generation, booking, attendance and usage accounting).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Benefit { .. } => commands::benefit::handle(&cli.command, cfg),
        Commands::Settings { .. } => commands::settings::handle(&cli.command, cfg),
        Commands::Slots { .. } => commands::slots::handle(&cli.command, cfg),
        Commands::Book { .. } => commands::book::handle(&cli.command, cfg),
        Commands::Cancel { .. } => commands::cancel::handle(&cli.command, cfg),
        Commands::Attend { .. } => commands::attend::handle(&cli.command, cfg),
        Commands::Usage { .. } => commands::usage::handle(&cli.command, cfg),
        Commands::Membership { .. } => commands::membership::handle(&cli.command, cfg),
        Commands::Bookings { .. } => commands::bookings::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once; --db overrides its database path
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    tracing::debug!(database = %cfg.database, "configuration loaded");
    dispatch(&cli, &cfg)
}
