use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "kakeibo", version, about = "Household ledger ingest and budget tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest a normalized export into the ledger and categorize the new rows.
    Run(RunArgs),
    /// Inspect and validate the budget configuration.
    Budget(BudgetArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Normalized export CSV to ingest.
    #[arg(long)]
    pub input: PathBuf,

    /// Ledger CSV. New rows are prepended newest-first; the file is created
    /// if it does not exist yet.
    #[arg(long)]
    pub ledger: PathBuf,

    /// Per-row categorization output CSV. Defaults to the ledger path with a
    /// `.categories.csv` extension.
    #[arg(long)]
    pub categories_out: Option<PathBuf>,

    /// Classification rules file (JSON array).
    #[arg(long, env = "KAKEIBO_RULES", default_value = "data/rules.json")]
    pub rules: PathBuf,

    /// Category allow-list file (JSON array). Missing file means no restriction.
    #[arg(long, env = "KAKEIBO_CATEGORIES", default_value = "data/categories.json")]
    pub categories: PathBuf,

    /// Suggestion keyword file (JSON array). Missing file disables suggestions.
    #[arg(long, env = "KAKEIBO_KEYWORDS", default_value = "data/budget_keywords.json")]
    pub keywords: PathBuf,
}

#[derive(Debug, Args)]
pub struct BudgetArgs {
    /// Budget configuration file (TOML).
    #[arg(long, env = "KAKEIBO_BUDGET", default_value = "data/budget_config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: BudgetCommand,
}

#[derive(Debug, Subcommand)]
pub enum BudgetCommand {
    /// Check config integrity; exits non-zero on hard failures.
    Validate,
    /// Print a local budget overview, no sheet access.
    Status,
    /// Write the projected budget rows as CSV (stdout when --out is omitted).
    Report {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
