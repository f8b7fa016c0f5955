use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use resale::cli::price::PricingOverrides;
use resale::cli::scenario::ScenarioCommand;
use resale::cli::stats::StatsOptions;
use resale::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for resale::AppCommand {
    fn from(cmd: Commands) -> resale::AppCommand {
        match cmd {
            Commands::Price(overrides) => resale::AppCommand::Price(overrides),
            Commands::Stats(options) => resale::AppCommand::Stats(options),
            Commands::Scenario { command } => resale::AppCommand::Scenario(command),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Price a listing from the baseline inputs plus overrides
    Price(PricingOverrides),
    /// Summarize profit over a product export
    Stats(StatsOptions),
    /// Manage saved pricing scenarios
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => resale::cli::setup::setup(),
        Some(cmd) => resale::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
