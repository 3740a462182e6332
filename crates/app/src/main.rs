use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

use args::{BudgetCommand, Cli, Command};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(run) => commands::run(run),
        Command::Budget(budget) => match budget.command {
            BudgetCommand::Validate => commands::budget_validate(&budget.config),
            BudgetCommand::Status => commands::budget_status(&budget.config),
            BudgetCommand::Report { out } => {
                commands::budget_report(&budget.config, out.as_deref())
            }
        },
    };
    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
