//! Shared error types for the award collection pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Invalid date window: {start} is after {end}")]
    InvalidDateWindow { start: String, end: String },

    #[error("Malformed award envelope: {message}")]
    MalformedEnvelope { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
