//! Core error types for lectio-core.
//!
//! This module defines the error hierarchy used across the library,
//! built on thiserror.

use thiserror::Error;

/// Core error type for lectio-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Plan generation and lookup errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Reading-progress errors
    #[error("Progress error: {0}")]
    Progress(#[from] ProgressError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Document-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: std::path::PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored document body could not be decoded
    #[error("Corrupt document at '{key}': {message}")]
    CorruptDocument { key: String, message: String },

    /// Store is locked by another writer
    #[error("Store is locked")]
    Locked,
}

/// Plan generation and lookup errors.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Strategy name not recognized by the generator
    #[error("Unknown plan strategy: '{0}'")]
    UnknownStrategy(String),

    /// Book name not present in the catalog
    #[error("Unknown book: '{0}'")]
    UnknownBook(String),

    /// Chapter number beyond the book's chapter count
    #[error("{book} has {max} chapters, got chapter {chapter}")]
    ChapterOutOfRange { book: String, chapter: u32, max: u32 },

    /// Plan lookup by name or id found nothing
    #[error("No plan named '{0}'")]
    NoSuchPlan(String),
}

/// Reading-progress errors.
#[derive(Error, Debug)]
pub enum ProgressError {
    /// markComplete called before start for this (user, plan) pair
    #[error("User '{user}' has not started plan {plan_id}")]
    PlanNotStarted { user: String, plan_id: uuid::Uuid },

    /// Chapter has no assignment in the plan's schedule
    #[error("Chapter {book} {chapter} is not part of plan {plan_id}")]
    ChapterNotInPlan {
        plan_id: uuid::Uuid,
        book: String,
        chapter: u32,
    },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed {
        path: std::path::PathBuf,
        message: String,
    },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed {
        path: std::path::PathBuf,
        message: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
