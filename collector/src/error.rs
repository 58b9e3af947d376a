//! Collector error types

use thiserror::Error;
use shared::{FetchFailure, SharedError};

/// Result type for collector operations
pub type CollectorResult<T> = Result<T, CollectorError>;

/// Collector error types
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Transport failure after {attempts} attempt(s): {failure}")]
    Transport { failure: FetchFailure, attempts: u32 },

    #[error("Award API reported an error [{codes}]: {messages}")]
    Protocol { codes: String, messages: String },

    #[error("All {attempted} strategies failed; last error: {last_error}")]
    CollectionFailed { attempted: usize, last_error: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollectorError {
    pub fn config(message: impl Into<String>) -> Self {
        CollectorError::Config {
            message: message.into(),
        }
    }
}
