//! Threshold classifier.
//!
//! Splits the score axis into three regions. Both boundaries are inclusive:
//! `total >= positive_min` is Positive and `total <= negative_max` is Negative.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::engine::ScoreTrace;
use crate::error::ConfigError;

/// Sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Positive, Label::Negative, Label::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
            Label::Neutral => "neutral",
        }
    }

    /// Label as shown to reviewers
    pub fn display_name(&self) -> &'static str {
        match self {
            Label::Positive => "Positivo",
            Label::Negative => "Negativo",
            Label::Neutral => "Neutral",
        }
    }
}

/// The two cut points of the score axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    positive_min: i64,
    negative_max: i64,
}

impl Thresholds {
    /// Fails unless `negative_max < positive_min`.
    pub fn new(positive_min: i64, negative_max: i64) -> Result<Self, ConfigError> {
        if negative_max >= positive_min {
            return Err(ConfigError::InvalidThresholds {
                positive_min,
                negative_max,
            });
        }
        Ok(Self {
            positive_min,
            negative_max,
        })
    }

    pub fn positive_min(&self) -> i64 {
        self.positive_min
    }

    pub fn negative_max(&self) -> i64 {
        self.negative_max
    }

    /// Label for a raw total
    pub fn label_for(&self, total: i64) -> Label {
        if total >= self.positive_min {
            Label::Positive
        } else if total <= self.negative_max {
            Label::Negative
        } else {
            Label::Neutral
        }
    }
}

/// Label plus confidence-like magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// `|total|` for Positive and Negative, 0 for Neutral
    pub magnitude: u64,
}

/// Classify a trace against the given thresholds
pub fn classify(trace: &ScoreTrace, thresholds: &Thresholds) -> ClassificationResult {
    let label = thresholds.label_for(trace.total);
    let magnitude = match label {
        Label::Neutral => 0,
        Label::Positive | Label::Negative => trace.total.unsigned_abs(),
    };
    ClassificationResult { label, magnitude }
}

/// Classifier bound to one threshold configuration
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, trace: &ScoreTrace) -> ClassificationResult {
        classify(trace, &self.thresholds)
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }
}
