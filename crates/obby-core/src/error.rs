//! Error types for the obby crates

use thiserror::Error;

/// The main error type for obby operations
#[derive(Debug, Error)]
pub enum ObbyError {
    #[error("Course error: {0}")]
    CourseError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Reward error: {0}")]
    RewardError(String),

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Result type alias for obby operations
pub type Result<T> = std::result::Result<T, ObbyError>;

impl From<toml::de::Error> for ObbyError {
    fn from(err: toml::de::Error) -> Self {
        ObbyError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for ObbyError {
    fn from(err: toml::ser::Error) -> Self {
        ObbyError::TomlSerError(err.to_string())
    }
}
