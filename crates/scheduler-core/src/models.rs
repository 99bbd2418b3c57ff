use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use sqlx::FromRow;

/// Format of the exact-date form of a search string.
pub const SEARCH_DATE_FORMAT: &str = "%d.%m.%Y";

/// A row of the `scheduler` table.
///
/// The id travels as a decimal string in JSON, the way web clients send it
/// back on update.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    #[serde_as(as = "DisplayFromStr")]
    pub id: i64,
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

/// Task fields as submitted by a client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDraft {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

/// Validated task data ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl NewTask {
    pub fn with_id(self, id: i64) -> Task {
        Task {
            id,
            date: self.date,
            title: self.title,
            comment: self.comment,
            repeat: self.repeat,
        }
    }
}

/// Selection applied by the task list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    /// Tasks scheduled exactly on this date.
    Date(NaiveDate),
    /// Tasks whose title or comment contains the text.
    Text(String),
}

impl TaskFilter {
    /// Interprets a user search string: empty lists everything, `DD.MM.YYYY`
    /// selects a date and anything else is a substring search.
    pub fn from_search(search: &str) -> Self {
        let search = search.trim();
        if search.is_empty() {
            return TaskFilter::All;
        }
        match NaiveDate::parse_from_str(search, SEARCH_DATE_FORMAT) {
            Ok(date) => TaskFilter::Date(date),
            Err(_) => TaskFilter::Text(search.to_string()),
        }
    }
}

/// Outcome of marking a task done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// A one-off task was removed.
    Deleted,
    /// A recurring task moved to its next date.
    Rescheduled { date: String },
}
