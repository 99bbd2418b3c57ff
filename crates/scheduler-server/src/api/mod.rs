//! JSON API under `/api` plus the static front end as fallback.

use axum::routing::{get, post};
use axum::Router;
use scheduler_core::repository::SqliteRepository;
use scheduler_core::service::TaskService;
use std::path::PathBuf;
use std::sync::Arc;

use crate::static_files;

pub mod dto;
pub mod error;
pub mod handlers;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TaskService<SqliteRepository>>,
    pub search_limit: i64,
    pub web_dir: PathBuf,
}

impl AppState {
    pub fn new(service: TaskService<SqliteRepository>, search_limit: i64, web_dir: PathBuf) -> Self {
        Self {
            service: Arc::new(service),
            search_limit,
            web_dir,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/nextdate", get(handlers::next_date))
        .route(
            "/api/task",
            get(handlers::get_task)
                .post(handlers::add_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/task/done", post(handlers::complete_task))
        .route("/api/tasks", get(handlers::list_tasks))
        .fallback(static_files::serve)
        .with_state(state)
}
