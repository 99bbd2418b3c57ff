//! Task policy shared by every front end: validation, date normalization and
//! completion, on top of any [`TaskRepository`].

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::error::CoreError;
use crate::models::{CompletionResult, NewTask, Task, TaskDraft, TaskFilter};
use crate::recurrence::{format_date, next_occurrence, parse_date, RepeatRule};
use crate::repository::TaskRepository;

/// Source of "today" for date policy decisions.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Parses the textual task id used by the HTTP interface.
pub fn parse_task_id(text: &str) -> Result<i64, CoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::InvalidInput("no task id specified".to_string()));
    }
    text.parse()
        .map_err(|_| CoreError::InvalidInput(format!("invalid task id '{}'", text)))
}

pub struct TaskService<R> {
    repo: R,
    clock: Clock,
}

impl<R: TaskRepository> TaskService<R> {
    /// Service whose "today" is the local calendar date.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, Arc::new(|| Local::now().date_naive()))
    }

    pub fn with_clock(repo: R, clock: Clock) -> Self {
        Self { repo, clock }
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Checks a draft and settles its stored date.
    ///
    /// An empty date means today. A date in the past becomes today for one-off
    /// tasks and the next occurrence for recurring ones. The rule, when
    /// present, must evaluate successfully against today.
    fn prepare(&self, draft: TaskDraft) -> Result<NewTask, CoreError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidInput("empty title".to_string()));
        }

        let today = self.today();
        let date = match draft.date.trim() {
            "" => today,
            text => parse_date(text)?,
        };

        let repeat = draft.repeat.trim();
        let date = if repeat.is_empty() {
            date.max(today)
        } else {
            let rule: RepeatRule = repeat.parse()?;
            let next = next_occurrence(today, date, &rule)?;
            if date < today {
                next
            } else {
                date
            }
        };

        Ok(NewTask {
            date: format_date(date),
            title: title.to_string(),
            comment: draft.comment,
            repeat: repeat.to_string(),
        })
    }

    pub async fn add_task(&self, draft: TaskDraft) -> Result<i64, CoreError> {
        let task = self.prepare(draft)?;
        let id = self.repo.add_task(task).await?;
        tracing::info!(id, "task created");
        Ok(id)
    }

    pub async fn get_task(&self, id: i64) -> Result<Task, CoreError> {
        self.repo
            .find_task_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    pub async fn list_tasks(&self, search: &str, limit: i64) -> Result<Vec<Task>, CoreError> {
        let filter = TaskFilter::from_search(search);
        tracing::debug!(?filter, limit, "listing tasks");
        self.repo.find_tasks(&filter, limit).await
    }

    pub async fn update_task(&self, id: i64, draft: TaskDraft) -> Result<(), CoreError> {
        let task = self.prepare(draft)?.with_id(id);
        self.repo.update_task(&task).await?;
        tracing::info!(id, "task updated");
        Ok(())
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), CoreError> {
        self.repo.delete_task(id).await?;
        tracing::info!(id, "task deleted");
        Ok(())
    }

    pub async fn complete_task(&self, id: i64) -> Result<CompletionResult, CoreError> {
        self.repo.complete_task(id, self.today()).await
    }
}
