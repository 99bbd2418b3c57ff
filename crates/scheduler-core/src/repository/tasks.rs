use crate::error::CoreError;
use crate::models::{CompletionResult, NewTask, Task, TaskFilter};
use crate::recurrence::{format_date, next_date};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};

const TASK_COLUMNS: &str = "SELECT id, date, title, comment, repeat FROM scheduler";

/// Escapes LIKE wildcards so user text matches literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn add_task(&self, data: NewTask) -> Result<i64, CoreError> {
        let result = sqlx::query(
            "INSERT INTO scheduler (date, title, comment, repeat) VALUES (?, ?, ?, ?)",
        )
        .bind(&data.date)
        .bind(&data.title)
        .bind(&data.comment)
        .bind(&data.repeat)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, date = %data.date, "task added");
        Ok(id)
    }

    async fn find_task_by_id(&self, id: i64) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as(&format!("{} WHERE id = ?", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_tasks(&self, filter: &TaskFilter, limit: i64) -> Result<Vec<Task>, CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(TASK_COLUMNS);

        match filter {
            TaskFilter::All => {}
            TaskFilter::Date(date) => {
                query_builder.push(" WHERE date = ").push_bind(format_date(*date));
            }
            TaskFilter::Text(text) => {
                let pattern = like_pattern(text);
                query_builder
                    .push(" WHERE title LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\' OR comment LIKE ")
                    .push_bind(pattern)
                    .push(" ESCAPE '\\'");
            }
        }

        query_builder.push(" ORDER BY date, id LIMIT ").push_bind(limit);

        let tasks = query_builder.build_query_as().fetch_all(self.pool()).await?;
        Ok(tasks)
    }

    async fn update_task(&self, task: &Task) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE scheduler SET date = ?, title = ?, comment = ?, repeat = ? WHERE id = ?",
        )
        .bind(&task.date)
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .bind(task.id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(task.id.to_string()));
        }
        tracing::debug!(id = task.id, date = %task.date, "task updated");
        Ok(())
    }

    async fn delete_task(&self, id: i64) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM scheduler WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        tracing::debug!(id, "task deleted");
        Ok(())
    }

    async fn complete_task(&self, id: i64, today: NaiveDate) -> Result<CompletionResult, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task: Task = sqlx::query_as(&format!("{} WHERE id = ?", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if task.repeat.trim().is_empty() {
            sqlx::query("DELETE FROM scheduler WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            tracing::info!(id, "one-off task done and removed");
            return Ok(CompletionResult::Deleted);
        }

        if task.date.is_empty() {
            return Err(CoreError::InvalidInput("empty date".to_string()));
        }

        let date = next_date(today, &task.date, &task.repeat)?;
        sqlx::query("UPDATE scheduler SET date = ? WHERE id = ?")
            .bind(&date)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(id, from = %task.date, to = %date, "recurring task rescheduled");
        Ok(CompletionResult::Rescheduled { date })
    }
}
