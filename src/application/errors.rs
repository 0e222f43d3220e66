//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Key-value store errors. Absence of a key is never an error; these cover
/// genuine failures of the store itself.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Value at \"{0}\" is not a counter")]
    NotCounter(String),

    #[error("Store operation timed out")]
    Timeout,
}

/// Completion service errors
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Missing access token")]
    MissingAccessToken,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: status {status}, {detail}")]
    Api { status: u16, detail: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Configuration errors - fatal at bootstrap
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Duplicate command token: {0}")]
    DuplicateCommand(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
