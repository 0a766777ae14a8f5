pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod fetchers;
pub mod http;
pub mod reports;
pub mod scoreboard;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::services::{ExportService, PollService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_poll() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::resolve();
        let service = PollService::new(config);
        service.run().await
    })
}

pub fn handle_export(event: Option<i64>) -> Result<()> {
    let config = AppConfig::resolve();
    let service = ExportService::new(config);
    service.run(event)
}
