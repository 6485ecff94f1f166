//! Error types for the day planner.
//!
//! The rule-engine pipeline itself never fails: extraction and classification
//! recover locally, and batch processing folds faults into defaults. Errors
//! only cross the boundaries to external collaborators (message source,
//! saved-item store, reminder scheduler) and configuration.

use std::path::PathBuf;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Message source error: {0}")]
    Source(#[from] SourceError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors surfaced by a message source adapter.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source {name} unavailable: {reason}")]
    Unavailable { name: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Saved-item persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reminder scheduling errors.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Reminder {id} not found")]
    NotFound { id: uuid::Uuid },

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),
}

/// Result type alias for the day planner.
pub type Result<T> = std::result::Result<T, Error>;
