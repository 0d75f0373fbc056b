//! Built-in configuration presets.
//!
//! Every preset shares the cosmetics review rule set and differs only in
//! its thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::SentimentConfig;
use crate::error::ConfigError;

const COSMETICS_REVIEWS: &str = include_str!("../../presets/cosmetics_reviews.toml");

/// Named threshold policy over the built-in rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// {+3, -2}
    #[default]
    Original,
    /// {+3, -3}
    Symmetric,
    /// {+2, -2}
    Lenient,
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown preset '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Original, Preset::Symmetric, Preset::Lenient];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Original => "original",
            Preset::Symmetric => "symmetric",
            Preset::Lenient => "lenient",
        }
    }

    /// (positive_min, negative_max)
    pub fn thresholds(&self) -> (i64, i64) {
        match self {
            Preset::Original => (3, -2),
            Preset::Symmetric => (3, -3),
            Preset::Lenient => (2, -2),
        }
    }

    /// Full configuration for this preset
    pub fn config(&self) -> Result<SentimentConfig, ConfigError> {
        let (positive_min, negative_max) = self.thresholds();
        Ok(SentimentConfig::from_toml_str(COSMETICS_REVIEWS)?.with_thresholds(positive_min, negative_max))
    }
}
