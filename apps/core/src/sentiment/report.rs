//! Sentiment Report - output structure handed to presentation layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::classifier::{ClassificationResult, Label};
use super::engine::ScoreTrace;
use super::expressions::ExpressionMatch;
use super::lexicon::TermMatch;

/// Complete result for one review text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    /// Original text, before normalization
    pub text: String,

    pub label: Label,

    /// `|total|` for Positive/Negative, 0 for Neutral
    pub magnitude: u64,

    /// Signed score before classification
    pub total: i64,

    pub matched_expressions: Vec<ExpressionMatch>,

    pub matched_terms: Vec<TermMatch>,

    /// Processing time in microseconds
    pub processing_time_us: u64,

    /// Timestamp of analysis
    pub timestamp: DateTime<Utc>,
}

impl SentimentReport {
    pub fn new(text: String, trace: ScoreTrace, result: ClassificationResult) -> Self {
        Self {
            text,
            label: result.label,
            magnitude: result.magnitude,
            total: trace.total,
            matched_expressions: trace.matched_expressions,
            matched_terms: trace.matched_terms,
            processing_time_us: 0,
            timestamp: Utc::now(),
        }
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Label: {} ({}), Total: {}, Expressions: {}, Terms: {}",
            self.label.display_name(),
            self.magnitude,
            self.total,
            self.matched_expressions.len(),
            self.matched_terms.len()
        )
    }
}

/// Per-label counts over a set of reports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDistribution {
    counts: BTreeMap<Label, usize>,
}

impl LabelDistribution {
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a SentimentReport>) -> Self {
        let mut distribution = Self::default();
        for report in reports {
            distribution.record(report.label);
        }
        distribution
    }

    pub fn record(&mut self, label: Label) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    pub fn count(&self, label: Label) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Share of `label` in [0, 1]; 0 when empty
    pub fn share(&self, label: Label) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(label) as f64 / total as f64,
        }
    }

    /// Labels ordered by descending count, ties in label order
    pub fn ranked(&self) -> Vec<(Label, usize)> {
        let mut ranked: Vec<(Label, usize)> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(label, count)| (*label, *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}
