use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "budget-history",
    version,
    about = "Browse saved budget summaries stored in SQLite"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "BUDGET_HISTORY_DB",
        help = "SQLite database file (default: ./budget_history.db)"
    )]
    pub db: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Do not insert sample summaries into an empty database"
    )]
    pub no_seed: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List summaries, newest first
    List(SummaryList),
    /// Show the category breakdown of one summary
    Show(SummaryShow),
    /// Remove every summary with the given title, date and time
    Remove(SummaryRemove),
}

#[derive(Args, Debug)]
pub struct SummaryList {
    #[arg(long, value_name = "TERM", help = "Only titles containing TERM")]
    pub search: Option<String>,
    #[arg(long, requires = "search")]
    pub match_case: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SummaryKey {
    pub title: String,
    pub date: String,
    pub time: String,
}

#[derive(Args, Debug)]
pub struct SummaryShow {
    #[command(flatten)]
    pub key: SummaryKey,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SummaryRemove {
    #[command(flatten)]
    pub key: SummaryKey,
}
