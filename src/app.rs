use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use tracing::{debug, info, warn};

use crate::category::parse_categories;
use crate::entities::summary;
use crate::error::AppError;
use crate::model::{EntryKey, ListQuery, SummaryDetail};

pub struct App {
    db: DatabaseConnection,
}

impl App {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Newest first by `date` then `time`, compared as plain strings.
    ///
    /// The title filter runs over the ordered snapshot rather than as a SQL
    /// `LIKE`, so `%` and `_` in the term are matched literally and case
    /// folding is not limited to ASCII.
    pub async fn list_summaries(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<summary::Model>, AppError> {
        let mut rows = summary::Entity::find()
            .order_by_desc(summary::Column::Date)
            .order_by_desc(summary::Column::Time)
            .order_by_asc(summary::Column::Id)
            .all(&self.db)
            .await?;
        rows.retain(|row| query.matches(&row.title));
        debug!(
            search = query.term().unwrap_or(""),
            match_case = query.match_case,
            count = rows.len(),
            "listed summaries"
        );
        Ok(rows)
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        Ok(summary::Entity::find().count(&self.db).await?)
    }

    /// First matching row by insertion order; duplicates of the key are
    /// indistinguishable to the caller.
    pub async fn find_by_key(&self, key: &EntryKey) -> Result<Option<summary::Model>, AppError> {
        Ok(summary::Entity::find()
            .filter(key_condition(key))
            .order_by_asc(summary::Column::Id)
            .one(&self.db)
            .await?)
    }

    pub async fn get_detail(&self, key: &EntryKey) -> Result<Option<SummaryDetail>, AppError> {
        let Some(summary) = self.find_by_key(key).await? else {
            return Ok(None);
        };
        let categories = parse_categories(&summary.categories).map_err(|err| {
            warn!(title = %key.title, date = %key.date, time = %key.time, %err, "unreadable categories");
            err
        })?;
        Ok(Some(SummaryDetail {
            summary,
            categories,
        }))
    }

    /// Removes every row carrying `key`. Zero matches is not an error.
    pub async fn delete_by_key(&self, key: &EntryKey) -> Result<u64, AppError> {
        let result = summary::Entity::delete_many()
            .filter(key_condition(key))
            .exec(&self.db)
            .await?;
        info!(
            title = %key.title,
            date = %key.date,
            time = %key.time,
            removed = result.rows_affected,
            "deleted summaries"
        );
        Ok(result.rows_affected)
    }
}

fn key_condition(key: &EntryKey) -> Condition {
    Condition::all()
        .add(summary::Column::Title.eq(key.title.as_str()))
        .add(summary::Column::Date.eq(key.date.as_str()))
        .add(summary::Column::Time.eq(key.time.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryAggregate, FormatReason};
    use crate::db;
    use crate::fixtures::sample_summaries;
    use crate::model::SummaryInput;
    use sea_orm::Set;
    use tempfile::TempDir;

    async fn setup_app() -> (TempDir, App) {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("data").join(db::DEFAULT_DB_FILE);
        db::ensure_parent_dir(&db_path).expect("ensure parent");
        let db = db::connect(&db_path).await.expect("connect db");
        db::ensure_schema(&db).await.expect("ensure schema");
        (dir, App::new(db))
    }

    async fn seeded_app() -> (TempDir, App) {
        let (dir, app) = setup_app().await;
        db::seed_if_empty(&app.db, sample_summaries())
            .await
            .expect("seed");
        (dir, app)
    }

    fn input(title: &str, date: &str, time: &str, categories: &str) -> SummaryInput {
        SummaryInput {
            title: title.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            budget: 100.0,
            total_spent: 80.0,
            remaining: 20.0,
            categories: categories.to_string(),
            description: String::new(),
        }
    }

    async fn insert(app: &App, row: SummaryInput) {
        let active = summary::ActiveModel {
            title: Set(row.title),
            date: Set(row.date),
            time: Set(row.time),
            budget: Set(row.budget),
            total_spent: Set(row.total_spent),
            remaining: Set(row.remaining),
            categories: Set(row.categories),
            description: Set(row.description),
            ..Default::default()
        };
        summary::Entity::insert(active)
            .exec(&app.db)
            .await
            .expect("insert summary");
    }

    fn keys(rows: &[summary::Model]) -> Vec<(String, String, String)> {
        rows.iter()
            .map(|row| (row.title.clone(), row.date.clone(), row.time.clone()))
            .collect()
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let (_dir, app) = seeded_app().await;
        let before = app.list_summaries(&ListQuery::all()).await.expect("list");

        for _ in 0..3 {
            db::ensure_schema(&app.db).await.expect("ensure schema again");
        }

        let after = app.list_summaries(&ListQuery::all()).await.expect("list");
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn seed_only_fills_empty_store() {
        let (_dir, app) = setup_app().await;
        let inserted = db::seed_if_empty(&app.db, sample_summaries())
            .await
            .expect("seed");
        assert_eq!(inserted, 5);
        assert_eq!(app.count().await.expect("count"), 5);

        let inserted = db::seed_if_empty(&app.db, sample_summaries())
            .await
            .expect("seed again");
        assert_eq!(inserted, 0);
        assert_eq!(app.count().await.expect("count"), 5);
    }

    #[tokio::test]
    async fn seed_skips_store_with_external_rows() {
        let (_dir, app) = setup_app().await;
        insert(&app, input("Imported", "2025-01-01", "08:00", "Food:80")).await;

        let inserted = db::seed_if_empty(&app.db, sample_summaries())
            .await
            .expect("seed");
        assert_eq!(inserted, 0);
        assert_eq!(app.count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn list_orders_by_date_then_time_descending() {
        let (_dir, app) = seeded_app().await;
        insert(&app, input("Late", "2025-03-28", "23:59", "Food:80")).await;
        insert(&app, input("Early", "2025-03-28", "00:01", "Food:80")).await;

        let rows = app.list_summaries(&ListQuery::all()).await.expect("list");
        assert_eq!(rows.len(), 7);
        for pair in rows.windows(2) {
            let left = (&pair[0].date, &pair[0].time);
            let right = (&pair[1].date, &pair[1].time);
            assert!(left >= right, "{left:?} before {right:?}");
        }
        assert_eq!(rows[0].title, "Late");
        assert_eq!(rows[1].title, "Groceries");
        assert_eq!(rows[2].title, "Early");
    }

    #[tokio::test]
    async fn filter_returns_subset_of_full_list() {
        let (_dir, app) = seeded_app().await;
        let all = app.list_summaries(&ListQuery::all()).await.expect("list");

        for term in ["Groceries", "o", "Trip", "&", "missing", "ROCER"] {
            let filtered = app
                .list_summaries(&ListQuery::search(term))
                .await
                .expect("filtered list");
            let expected: Vec<_> = all
                .iter()
                .filter(|row| row.title.to_lowercase().contains(&term.to_lowercase()))
                .cloned()
                .collect();
            assert_eq!(filtered, expected, "term {term}");
        }
    }

    #[tokio::test]
    async fn empty_filter_equals_full_list() {
        let (_dir, app) = seeded_app().await;
        let all = app.list_summaries(&ListQuery::all()).await.expect("list");
        let empty = app
            .list_summaries(&ListQuery::search(""))
            .await
            .expect("empty filter");
        assert_eq!(all, empty);
    }

    #[tokio::test]
    async fn filter_case_sensitivity_is_selectable() {
        let (_dir, app) = seeded_app().await;
        let insensitive = app
            .list_summaries(&ListQuery::search("groceries"))
            .await
            .expect("list");
        assert_eq!(insensitive.len(), 2);

        let sensitive = app
            .list_summaries(&ListQuery::search("groceries").match_case(true))
            .await
            .expect("list");
        assert!(sensitive.is_empty());

        let exact = app
            .list_summaries(&ListQuery::search("Groceries").match_case(true))
            .await
            .expect("list");
        assert_eq!(exact.len(), 2);
    }

    #[tokio::test]
    async fn filter_treats_wildcards_literally() {
        let (_dir, app) = setup_app().await;
        insert(&app, input("100% saved", "2025-01-02", "08:00", "Food:80")).await;
        insert(&app, input("1000 saved", "2025-01-01", "08:00", "Food:80")).await;

        let rows = app
            .list_summaries(&ListQuery::search("0%"))
            .await
            .expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "100% saved");

        let rows = app
            .list_summaries(&ListQuery::search("_"))
            .await
            .expect("list");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_every_match() {
        let (_dir, app) = seeded_app().await;
        let key = EntryKey::new("Groceries", "2025-03-28", "18:30");
        insert(&app, input("Groceries", "2025-03-28", "18:30", "Food:80")).await;
        assert_eq!(app.count().await.expect("count"), 6);

        let removed = app.delete_by_key(&key).await.expect("delete");
        assert_eq!(removed, 2);
        assert_eq!(app.count().await.expect("count"), 4);

        let rows = app.list_summaries(&ListQuery::all()).await.expect("list");
        assert!(rows.iter().all(|row| EntryKey::of(row) != key));
        assert!(rows
            .iter()
            .any(|row| row.title == "Groceries" && row.date == "2025-02-27"));
    }

    #[tokio::test]
    async fn delete_without_match_is_noop() {
        let (_dir, app) = seeded_app().await;
        let before = app.list_summaries(&ListQuery::all()).await.expect("list");

        let removed = app
            .delete_by_key(&EntryKey::new("Groceries", "2025-03-28", "18:31"))
            .await
            .expect("delete");
        assert_eq!(removed, 0);

        let after = app.list_summaries(&ListQuery::all()).await.expect("list");
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn delete_matches_fields_exactly() {
        let (_dir, app) = seeded_app().await;
        let removed = app
            .delete_by_key(&EntryKey::new("groceries", "2025-03-28", "18:30"))
            .await
            .expect("delete");
        assert_eq!(removed, 0);
        assert_eq!(app.count().await.expect("count"), 5);
    }

    #[tokio::test]
    async fn detail_missing_key_is_none() {
        let (_dir, app) = seeded_app().await;
        let detail = app
            .get_detail(&EntryKey::new("Nothing", "2025-01-01", "00:00"))
            .await
            .expect("detail");
        assert!(detail.is_none());
    }

    #[tokio::test]
    async fn detail_format_error_leaves_row_untouched() {
        let (_dir, app) = setup_app().await;
        insert(&app, input("Broken", "2025-01-01", "08:00", "Food-500")).await;
        let key = EntryKey::new("Broken", "2025-01-01", "08:00");

        let err = app.get_detail(&key).await.unwrap_err();
        match err {
            AppError::Format(err) => assert_eq!(err.reason, FormatReason::MissingSeparator),
            other => panic!("unexpected error: {other}"),
        }

        let row = app.find_by_key(&key).await.expect("find").expect("row");
        assert_eq!(row.categories, "Food-500");
        let rows = app.list_summaries(&ListQuery::all()).await.expect("list");
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn detail_reports_balance_drift() {
        let (_dir, app) = setup_app().await;
        let mut row = input("Drifted", "2025-01-01", "08:00", "Food:80");
        row.remaining = 5.0;
        insert(&app, row).await;

        let detail = app
            .get_detail(&EntryKey::new("Drifted", "2025-01-01", "08:00"))
            .await
            .expect("detail")
            .expect("row");
        assert_eq!(detail.balance_drift(), Some(15.0));
        assert_eq!(detail.summary.remaining, 5.0);
    }

    #[tokio::test]
    async fn groceries_scenario() {
        let (_dir, app) = seeded_app().await;

        let all = app.list_summaries(&ListQuery::all()).await.expect("list");
        assert_eq!(
            keys(&all),
            vec![
                ("Groceries".into(), "2025-03-28".into(), "18:30".into()),
                ("Weekend Trip".into(), "2025-03-15".into(), "10:15".into()),
                ("Rent & Utilities".into(), "2025-03-01".into(), "09:00".into()),
                ("Groceries".into(), "2025-02-27".into(), "17:45".into()),
                ("Holiday Shopping".into(), "2024-12-20".into(), "14:00".into()),
            ]
        );

        let groceries = app
            .list_summaries(&ListQuery::search("Groceries"))
            .await
            .expect("search");
        assert_eq!(groceries.len(), 2);
        let latest = &groceries[0];
        assert_eq!(latest.categories, "Food:1500, Essentials:500");

        let detail = app
            .get_detail(&EntryKey::of(latest))
            .await
            .expect("detail")
            .expect("row");
        let expected: CategoryAggregate =
            [("Food", 1500.0), ("Essentials", 500.0)].into_iter().collect();
        assert_eq!(detail.categories, expected);
        assert_eq!(detail.categories.total(), 2000.0);
        assert_eq!(detail.categories.total(), latest.total_spent);
        assert_eq!(detail.balance_drift(), None);
    }
}
