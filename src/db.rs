use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Schema, Set,
};
use tracing::{debug, info};
use url::Url;

use crate::entities::summary;
use crate::error::AppError;
use crate::model::SummaryInput;

pub const DEFAULT_DB_FILE: &str = "budget_history.db";

pub fn resolve_db_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn open_lock(path: &Path) -> Result<fd_lock::RwLock<File>, AppError> {
    let lock_path = path.with_extension("lock");
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(lock_path)?;
    Ok(fd_lock::RwLock::new(file))
}

pub async fn connect(path: &Path) -> Result<DatabaseConnection, AppError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut url = Url::from_file_path(&absolute).map_err(|_| {
        AppError::InvalidInput(format!("invalid sqlite path: {}", path.display()))
    })?;
    url.set_query(Some("mode=rwc"));
    let sqlite_url = url.as_str().replacen("file://", "sqlite://", 1);
    debug!(url = %sqlite_url, "connecting");
    Ok(Database::connect(&sqlite_url).await?)
}

pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), AppError> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut summary_stmt = schema.create_table_from_entity(summary::Entity);
    summary_stmt.if_not_exists();
    db.execute(builder.build(&summary_stmt)).await?;

    let mut recency_index = Index::create()
        .name("idx_summaries_date_time")
        .table(summary::Entity)
        .col(summary::Column::Date)
        .col(summary::Column::Time)
        .to_owned();
    recency_index.if_not_exists();
    db.execute(builder.build(&recency_index)).await?;

    debug!("schema ready");
    Ok(())
}

/// Inserts `rows` only when the table is empty. Returns the number inserted.
pub async fn seed_if_empty(
    db: &DatabaseConnection,
    rows: Vec<SummaryInput>,
) -> Result<u64, AppError> {
    let existing = summary::Entity::find().count(db).await?;
    if existing > 0 {
        debug!(existing, "store not empty, skipping seed");
        return Ok(0);
    }
    if rows.is_empty() {
        return Ok(0);
    }

    let count = rows.len() as u64;
    let models = rows.into_iter().map(|row| summary::ActiveModel {
        title: Set(row.title),
        date: Set(row.date),
        time: Set(row.time),
        budget: Set(row.budget),
        total_spent: Set(row.total_spent),
        remaining: Set(row.remaining),
        categories: Set(row.categories),
        description: Set(row.description),
        ..Default::default()
    });
    summary::Entity::insert_many(models).exec(db).await?;
    info!(count, "seeded fixture summaries");
    Ok(count)
}
