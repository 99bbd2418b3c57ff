use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{CompletionResult, NewTask, Task, TaskFilter};
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod tasks;

/// Storage operations on the `scheduler` table.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task and returns its new id.
    async fn add_task(&self, data: NewTask) -> Result<i64, CoreError>;
    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, CoreError>;
    /// Tasks matching `filter`, earliest date first, at most `limit` of them.
    async fn find_tasks(&self, filter: &TaskFilter, limit: i64) -> Result<Vec<Task>, CoreError>;
    async fn update_task(&self, task: &Task) -> Result<(), CoreError>;
    async fn delete_task(&self, id: i64) -> Result<(), CoreError>;
    /// Marks a task done as of `today`: one-off tasks are deleted, recurring
    /// ones move to their next date.
    async fn complete_task(&self, id: i64, today: NaiveDate) -> Result<CompletionResult, CoreError>;
}

/// SQLite implementation of [`TaskRepository`].
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
