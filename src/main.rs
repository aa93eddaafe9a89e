mod app;
mod category;
mod cli;
mod db;
mod entities;
mod error;
mod fixtures;
mod model;
mod util;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::{Cli, Command, SummaryKey, SummaryList, SummaryRemove, SummaryShow};
use crate::error::AppError;
use crate::model::{EntryKey, ListQuery};
use crate::util::{format_summary_detail, format_summary_table};

const LOG_FILTER_ENV: &str = "BUDGET_HISTORY_LOG";
const DEFAULT_LOG_FILTER: &str = "error";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> Result<(), AppError> {
    let Cli {
        db: db_flag,
        no_seed,
        command,
    } = Cli::parse();

    let db_path = db::resolve_db_path(db_flag);
    db::ensure_parent_dir(&db_path)?;
    let mut lock = db::open_lock(&db_path)?;
    let _guard = lock.write()?;

    let conn = db::connect(&db_path).await?;
    db::ensure_schema(&conn).await?;
    if !no_seed {
        db::seed_if_empty(&conn, fixtures::sample_summaries()).await?;
    }
    let app = App::new(conn);

    match command {
        Command::List(args) => handle_list(&app, args).await,
        Command::Show(args) => handle_show(&app, args).await,
        Command::Remove(args) => handle_remove(&app, args).await,
    }
}

impl From<SummaryKey> for EntryKey {
    fn from(value: SummaryKey) -> Self {
        EntryKey::new(value.title, value.date, value.time)
    }
}

async fn handle_list(app: &App, args: SummaryList) -> Result<(), AppError> {
    let SummaryList {
        search,
        match_case,
        json,
    } = args;
    let query = match search {
        Some(term) => ListQuery::search(term).match_case(match_case),
        None => ListQuery::all(),
    };
    let rows = app.list_summaries(&query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if rows.is_empty() {
        println!("No summaries found.");
        return Ok(());
    }
    println!("{}", format_summary_table(&rows));
    Ok(())
}

async fn handle_show(app: &App, args: SummaryShow) -> Result<(), AppError> {
    let key = EntryKey::from(args.key);
    let Some(detail) = app.get_detail(&key).await? else {
        if args.json {
            println!("null");
        } else {
            println!("No summary found.");
        }
        return Ok(());
    };

    if args.json {
        let payload = json!({
            "summary": detail.summary,
            "categories": detail.categories,
            "total": detail.categories.total(),
            "slices": detail.categories.slices(),
            "balance_drift": detail.balance_drift(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }
    println!("{}", format_summary_detail(&detail));
    Ok(())
}

async fn handle_remove(app: &App, args: SummaryRemove) -> Result<(), AppError> {
    let key = EntryKey::from(args.key);
    let removed = app.delete_by_key(&key).await?;
    match removed {
        0 => println!("No summary found."),
        1 => println!("Removed 1 summary."),
        count => println!("Removed {count} summaries."),
    }
    Ok(())
}
