use serde::{Deserialize, Serialize};

use crate::category::CategoryAggregate;
use crate::entities::summary;

/// Differences smaller than this are rounding noise in stored amounts.
pub const DRIFT_TOLERANCE: f64 = 0.005;

/// Natural key of a summary row. Not unique: several rows may share it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EntryKey {
    pub title: String,
    pub date: String,
    pub time: String,
}

impl EntryKey {
    pub fn new(title: impl Into<String>, date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            time: time.into(),
        }
    }

    pub fn of(model: &summary::Model) -> Self {
        Self::new(&model.title, &model.date, &model.time)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummaryInput {
    pub title: String,
    pub date: String,
    pub time: String,
    pub budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub categories: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub match_case: bool,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            match_case: false,
        }
    }

    pub fn match_case(mut self, match_case: bool) -> Self {
        self.match_case = match_case;
        self
    }

    /// Blank search terms select everything.
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().filter(|term| !term.is_empty())
    }

    pub fn matches(&self, title: &str) -> bool {
        match self.term() {
            None => true,
            Some(term) if self.match_case => title.contains(term),
            Some(term) => title.to_lowercase().contains(&term.to_lowercase()),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SummaryDetail {
    pub summary: summary::Model,
    pub categories: CategoryAggregate,
}

impl SummaryDetail {
    /// `budget - total_spent - remaining`; the store never reconciles these.
    pub fn balance_drift(&self) -> Option<f64> {
        let drift = self.summary.budget - self.summary.total_spent - self.summary.remaining;
        (drift.abs() > DRIFT_TOLERANCE).then_some(drift)
    }
}
