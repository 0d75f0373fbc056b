use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::sentiment::lexicon::Polarity;

/// Malformed or contradictory rule configuration.
///
/// Every variant is raised while building the engine; an engine that failed
/// to build is never handed out, so there is no degraded mode.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The same surface form was declared twice with the same polarity.
    #[error("Duplicate {polarity} lexicon entry: '{surface_form}'")]
    DuplicateTerm {
        surface_form: String,
        polarity: Polarity,
    },

    /// An expression pattern failed to compile.
    #[error("Invalid expression pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// An expression pattern nests unbounded repetition, e.g. `(a+)+`.
    #[error("Expression pattern '{pattern}' nests unbounded repetition")]
    BacktrackingPattern { pattern: String },

    /// `negative_max` must be strictly lower than `positive_min`.
    #[error(
        "Invalid thresholds: negative_max ({negative_max}) must be lower than positive_min ({positive_min})"
    )]
    InvalidThresholds { positive_min: i64, negative_max: i64 },

    /// Field-level validation failures (empty terms, zero weights, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The configuration file could not be read.
    #[error("Failed to read configuration file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration document is not valid TOML or has the wrong shape.
    #[error("Configuration parse error: {0}")]
    Parse(String),
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConfigError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum SentimentError {
    /// Fatal configuration problem, see [`ConfigError`].
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The caller handed over something that is not text.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SentimentError {
    /// Returns true for per-call input errors, which leave the engine untouched.
    pub fn is_input_error(&self) -> bool {
        matches!(self, SentimentError::InvalidInput(_))
    }
}

impl From<std::str::Utf8Error> for SentimentError {
    fn from(err: std::str::Utf8Error) -> Self {
        SentimentError::InvalidInput(format!("text is not valid UTF-8: {}", err))
    }
}
