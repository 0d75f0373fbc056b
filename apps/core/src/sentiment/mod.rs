//! # Sentiment Module
//!
//! Deterministic, explainable sentiment scoring for short review texts.
//!
//! ## Components
//! - `lexicon`: weighted terms and phrases, matched as substrings
//! - `expressions`: regex-encoded idioms with fixed score deltas
//! - `engine`: normalization and score accumulation
//! - `classifier`: threshold-based labelling
//! - `report`: output data structure and label distribution
//! - `presets`: built-in rule set and threshold policies
//! - `analyzer`: main orchestrator

pub mod analyzer;
pub mod classifier;
pub mod engine;
pub mod expressions;
pub mod lexicon;
pub mod presets;
pub mod report;

pub use analyzer::SentimentAnalyzer;
pub use classifier::{classify, ClassificationResult, Classifier, Label, Thresholds};
pub use engine::{normalize, ScoreTrace, ScoringEngine};
pub use expressions::{ExpressionMatch, ExpressionMatcher, ExpressionRule};
pub use lexicon::{LexiconEntry, LexiconStore, Polarity, TermMatch};
pub use presets::Preset;
pub use report::{LabelDistribution, SentimentReport};
