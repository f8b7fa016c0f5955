pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::price::PricingOverrides;
use crate::cli::scenario::ScenarioCommand;
use crate::cli::stats::StatsOptions;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Price(PricingOverrides),
    Stats(StatsOptions),
    Scenario(ScenarioCommand),
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Resale pricer starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Price(overrides) => cli::price::run(&config, &overrides),
        AppCommand::Stats(options) => cli::stats::run(&config, &options),
        AppCommand::Scenario(command) => {
            let storage = store::open_default(&config)?;
            cli::scenario::run(storage, &config, &command)
        }
    }
}
