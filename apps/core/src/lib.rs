//! Rule-based sentiment scoring for consumer reviews.
//!
//! Text goes through a fixed pipeline: normalize, match idiomatic
//! expressions, look up lexicon terms, sum the signed contributions, then
//! classify the total against two thresholds. Every rule that fired is kept
//! in the result so a label can always be explained.
//!
//! ```rust,ignore
//! use review_sentiment::{Preset, SentimentAnalyzer};
//!
//! let analyzer = SentimentAnalyzer::from_preset(Preset::Original)?;
//! let report = analyzer.analyze("Excelente, lo recomiendo");
//! println!("{} ({})", report.label, report.magnitude);
//! ```

pub mod config;
pub mod error;
pub mod sentiment;
pub mod telemetry;

pub use config::SentimentConfig;
pub use error::{ConfigError, SentimentError};
pub use sentiment::{
    ClassificationResult, Label, LabelDistribution, Polarity, Preset, ScoreTrace,
    SentimentAnalyzer, SentimentReport, Thresholds,
};

#[cfg(test)]
mod tests;
