use thiserror::Error;

/// Failures of a single next-date computation.
///
/// Every variant is terminal: the engine is deterministic, so retrying the
/// same call yields the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Invalid date '{0}': expected YYYYMMDD")]
    DateSyntax(String),

    #[error("Invalid repeat rule: {0}")]
    RuleSyntax(String),

    #[error("Next date not found within {0} iterations")]
    IterationLimitExceeded(u32),

    #[error("Date is outside the supported calendar range")]
    DateOutOfRange,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Recurrence(#[from] RecurrenceError),
}
