//! Declarative rule configuration.
//!
//! A configuration is one TOML document:
//!
//! ```toml
//! [thresholds]
//! positive_min = 3
//! negative_max = -2
//!
//! [[lexicon]]
//! term = "excelente"
//! polarity = "positive"
//! weight = 2
//!
//! [[expressions]]
//! pattern = 'no me gust[oó]'
//! delta = -3
//! ```
//!
//! Loading only parses and checks field-level constraints. Duplicate terms,
//! regex compilation and threshold ordering are checked when the engine is
//! built from the configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use validator::Validate;

use crate::error::ConfigError;
use crate::sentiment::classifier::Thresholds;
use crate::sentiment::expressions::ExpressionRule;
use crate::sentiment::lexicon::{LexiconEntry, Polarity};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "SENTIMENT_CONFIG";

/// File looked up in the working directory when the variable is unset
pub const DEFAULT_CONFIG_FILE: &str = "sentiment.toml";

/// Raw threshold values, checked by [`ThresholdsConfig::build`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    pub positive_min: i64,
    pub negative_max: i64,
}

impl ThresholdsConfig {
    pub fn build(&self) -> Result<Thresholds, ConfigError> {
        Thresholds::new(self.positive_min, self.negative_max)
    }
}

/// Complete rule set for one engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SentimentConfig {
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    #[validate(nested)]
    pub lexicon: Vec<LexiconEntry>,

    #[serde(default)]
    #[validate(nested)]
    pub expressions: Vec<ExpressionRule>,
}

impl SentimentConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SentimentConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            terms = config.lexicon.len(),
            expressions = config.expressions.len(),
            "Loaded sentiment configuration"
        );
        Ok(config)
    }

    /// Load from `$SENTIMENT_CONFIG`, or `sentiment.toml` in the working
    /// directory when the variable is unset. A missing file is an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_file(Self::resolve_path())
    }

    /// Path `load()` will read from
    pub fn resolve_path() -> PathBuf {
        Self::env_path().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// `$SENTIMENT_CONFIG`, if set and non-empty
    pub fn env_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Same rule set under different thresholds
    pub fn with_thresholds(mut self, positive_min: i64, negative_max: i64) -> Self {
        self.thresholds = ThresholdsConfig {
            positive_min,
            negative_max,
        };
        self
    }

    pub fn term_count(&self, polarity: Polarity) -> usize {
        self.lexicon.iter().filter(|e| e.polarity == polarity).count()
    }
}
