use thiserror::Error;

/// Failures of the usage store. Anything above the store wraps these into `anyhow`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Application '{app_name}' has never been observed")]
    UnknownApp { app_name: String },

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
