// Error types for rule construction and configuration

use thiserror::Error;

/// Programmer and configuration errors.
///
/// Bad input data never produces one of these: a rule that rejects its input
/// records a failure message instead. These surface only from fallible
/// constructors, configuration loading and report serialization.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid bounds: minimum {min} is greater than maximum {max}")]
    InvalidBounds { min: usize, max: usize },

    #[error("Configuration error for '{key}': {message}")]
    Config { key: String, message: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
