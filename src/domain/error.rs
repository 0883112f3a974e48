//! Domain error types

use thiserror::Error;

/// Error when a typing request cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("No text provided")]
    EmptyText,

    #[error("Invalid speed: {0}. Speed must be at least 1 character per second")]
    InvalidSpeed(u32),

    #[error("Invalid jitter: {0}. Jitter must be between 0 and 100 percent")]
    JitterOutOfRange(u8),

    #[error("Malformed request: {0}")]
    Malformed(String),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
