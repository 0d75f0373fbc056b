//! Sentiment Analyzer - main orchestrator for the sentiment module.
//!
//! Runs the scoring engine and the classifier for one text or a batch of
//! texts. Batches above [`PARALLEL_THRESHOLD`] are scored on the rayon pool
//! when the `parallel` feature is on; results keep input order either way.

use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::classifier::{Classifier, Label};
use super::engine::ScoringEngine;
use super::expressions::ExpressionMatcher;
use super::lexicon::{LexiconStore, Polarity};
use super::presets::Preset;
use super::report::{LabelDistribution, SentimentReport};
use crate::config::SentimentConfig;
use crate::error::{ConfigError, SentimentError};

/// Batches larger than this are scored in parallel
pub const PARALLEL_THRESHOLD: usize = 16;

/// Main sentiment analyzer that ties the engine to a threshold policy
#[derive(Debug)]
pub struct SentimentAnalyzer {
    engine: ScoringEngine,
    classifier: Classifier,
}

impl SentimentAnalyzer {
    pub fn new(engine: ScoringEngine, classifier: Classifier) -> Self {
        Self { engine, classifier }
    }

    /// Build every component from a declarative configuration.
    pub fn from_config(config: SentimentConfig) -> Result<Self, ConfigError> {
        let thresholds = config.thresholds.build()?;
        let lexicon = LexiconStore::new(config.lexicon)?;
        let expressions = ExpressionMatcher::new(config.expressions)?;

        info!(
            positive_terms = lexicon.count(Polarity::Positive),
            negative_terms = lexicon.count(Polarity::Negative),
            expressions = expressions.len(),
            positive_min = thresholds.positive_min(),
            negative_max = thresholds.negative_max(),
            "Sentiment analyzer ready"
        );

        Ok(Self::new(
            ScoringEngine::new(lexicon, expressions),
            Classifier::new(thresholds),
        ))
    }

    pub fn from_preset(preset: Preset) -> Result<Self, ConfigError> {
        Self::from_config(preset.config()?)
    }

    /// Score and classify one text
    pub fn analyze(&self, text: &str) -> SentimentReport {
        let start = Instant::now();

        let trace = self.engine.score(text);
        let result = self.classifier.classify(&trace);
        let mut report = SentimentReport::new(text.to_string(), trace, result);
        report.processing_time_us = start.elapsed().as_micros() as u64;

        debug!("{}", report.summary());
        report
    }

    /// Analyze raw bytes; non-UTF-8 input is rejected.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<SentimentReport, SentimentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.analyze(text))
    }

    /// Analyze a JSON value; anything but a string is rejected.
    pub fn analyze_value(&self, value: &Value) -> Result<SentimentReport, SentimentError> {
        match value {
            Value::String(text) => Ok(self.analyze(text)),
            other => Err(SentimentError::InvalidInput(format!(
                "expected a string, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Analyze many texts. Output order matches input order.
    pub fn analyze_batch<S>(&self, texts: &[S]) -> Vec<SentimentReport>
    where
        S: AsRef<str> + Sync,
    {
        let reports = self.map_batch(texts, |text| self.analyze(text.as_ref()));
        info!(
            size = reports.len(),
            positive = count(&reports, Label::Positive),
            negative = count(&reports, Label::Negative),
            neutral = count(&reports, Label::Neutral),
            "Batch analyzed"
        );
        reports
    }

    /// Analyze many JSON values, one result per item in input order.
    pub fn analyze_values(&self, values: &[Value]) -> Vec<Result<SentimentReport, SentimentError>> {
        let results = self.map_batch(values, |value| self.analyze_value(value));
        for (index, result) in results.iter().enumerate() {
            if let Err(e) = result {
                warn!(index, error = %e, "Rejected batch item");
            }
        }
        results
    }

    /// Analyze a batch and tally the labels
    pub fn distribution<S>(&self, texts: &[S]) -> LabelDistribution
    where
        S: AsRef<str> + Sync,
    {
        LabelDistribution::from_reports(&self.analyze_batch(texts))
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn map_batch<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        {
            if items.len() > PARALLEL_THRESHOLD {
                use rayon::prelude::*;
                return items.par_iter().map(f).collect();
            }
        }
        items.iter().map(f).collect()
    }
}

fn count(reports: &[SentimentReport], label: Label) -> usize {
    reports.iter().filter(|r| r.label == label).count()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
