//! # Scheduler Core Library
//!
//! Recurring to-do items backed by SQLite, with a small rule grammar for
//! repetition.
//!
//! ## Core Modules
//!
//! - [`recurrence`]: Pure next-date engine for `d`, `y`, `w` and `m` rules
//! - [`db`]: Database connection and migration management
//! - [`models`]: Task rows, drafts and filters
//! - [`repository`]: Data access layer with Repository pattern
//! - [`service`]: Validation and date policy applied to every task change
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use scheduler_core::{
//!     db, models::TaskDraft, repository::SqliteRepository, service::TaskService,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scheduler_core::error::CoreError> {
//!     let pool = db::establish_connection("scheduler.db").await?;
//!     let service = TaskService::new(SqliteRepository::new(pool));
//!
//!     let id = service
//!         .add_task(TaskDraft {
//!             title: "Pay rent".to_string(),
//!             repeat: "m 1".to_string(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created task {}", id);
//!
//!     Ok(())
//! }
//! ```
//!
//! The engine alone needs no database:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use scheduler_core::recurrence::next_date;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! assert_eq!(next_date(now, "20240131", "d 7").unwrap(), "20240306");
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod service;
