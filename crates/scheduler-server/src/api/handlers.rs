use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use scheduler_core::models::{CompletionResult, Task, TaskDraft};
use scheduler_core::recurrence::{next_date as compute_next_date, parse_date};
use scheduler_core::service::parse_task_id;

use super::dto::{
    CreatedResponse, EmptyResponse, IdQuery, NextDateQuery, SearchQuery, TasksResponse,
    UpdateTaskRequest,
};
use super::error::ApiError;
use super::AppState;

/// `GET /api/nextdate`: plain-text next date, or a plain-text 400.
pub async fn next_date(Query(query): Query<NextDateQuery>) -> Result<String, (StatusCode, String)> {
    if query.now.is_empty() || query.date.is_empty() || query.repeat.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "now, date and repeat are required".to_string(),
        ));
    }
    let now = parse_date(&query.now)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid 'now' parameter: {}", e)))?;
    compute_next_date(now, &query.date, &query.repeat)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

pub async fn add_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let Json(draft) = payload?;
    let id = state.service.add_task(draft).await?;
    Ok(Json(CreatedResponse { id }))
}

pub async fn get_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&query.id)?;
    Ok(Json(state.service.get_task(id).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let Json(request) = payload?;
    let id = parse_task_id(&request.id)?;
    state.service.update_task(id, request.draft).await?;
    Ok(Json(EmptyResponse::default()))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let id = parse_task_id(&query.id)?;
    state.service.delete_task(id).await?;
    Ok(Json(EmptyResponse::default()))
}

/// `POST /api/task/done`: deletes a one-off task or moves a recurring one.
pub async fn complete_task(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let id = parse_task_id(&query.id)?;
    match state.service.complete_task(id).await? {
        CompletionResult::Deleted => tracing::debug!(id, "done: deleted"),
        CompletionResult::Rescheduled { date } => tracing::debug!(id, %date, "done: rescheduled"),
    }
    Ok(Json(EmptyResponse::default()))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<TasksResponse>, ApiError> {
    let tasks = state
        .service
        .list_tasks(&query.search, state.search_limit)
        .await?;
    Ok(Json(TasksResponse { tasks }))
}
