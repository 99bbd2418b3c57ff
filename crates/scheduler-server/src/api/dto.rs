use scheduler_core::models::{Task, TaskDraft};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct IdQuery {
    pub id: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SearchQuery {
    pub search: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct NextDateQuery {
    pub now: String,
    pub date: String,
    pub repeat: String,
}

/// Body of `PUT /api/task`: the task fields plus its textual id.
#[derive(Deserialize, Debug)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub draft: TaskDraft,
}

#[derive(Serialize, Debug)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Serialize, Debug)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// The `{}` acknowledgement of mutating endpoints.
#[derive(Serialize, Debug, Default)]
pub struct EmptyResponse {}
