//! Scoring Engine.
//!
//! Normalizes a text, runs the expression matcher and then the lexicon, and
//! accumulates a signed total. Scoring is a pure function of the text and
//! the immutable rule set, so one engine can be shared across threads.
//!
//! Each rule fires at most once per text. Appending a positive term never
//! lowers the total, unless the concatenation completes a negative rule
//! across the join: with the built-in rules, "me gusta, pero no" scores 0
//! while "me gusta, pero no funciona" also fires `no funciona` (-3) and
//! lands at -2.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::expressions::{ExpressionMatch, ExpressionMatcher};
use super::lexicon::{LexiconStore, TermMatch};
use crate::error::SentimentError;

/// Explainable result of scoring one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTrace {
    /// Signed sum of every delta and weight that fired
    pub total: i64,
    /// Expressions that fired, in declaration order
    pub matched_expressions: Vec<ExpressionMatch>,
    /// Lexicon entries that fired, in declaration order
    pub matched_terms: Vec<TermMatch>,
}

impl ScoreTrace {
    pub fn empty() -> Self {
        Self {
            total: 0,
            matched_expressions: vec![],
            matched_terms: vec![],
        }
    }

    /// Number of rules that contributed
    pub fn rule_count(&self) -> usize {
        self.matched_expressions.len() + self.matched_terms.len()
    }
}

/// Lowercase the text. Diacritics are kept.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Rule-based scorer over a fixed lexicon and expression set
#[derive(Debug)]
pub struct ScoringEngine {
    lexicon: LexiconStore,
    expressions: ExpressionMatcher,
}

impl ScoringEngine {
    pub fn new(lexicon: LexiconStore, expressions: ExpressionMatcher) -> Self {
        Self {
            lexicon,
            expressions,
        }
    }

    /// Score a text. Empty and whitespace-only text scores zero.
    pub fn score(&self, text: &str) -> ScoreTrace {
        if text.trim().is_empty() {
            return ScoreTrace::empty();
        }

        let normalized = normalize(text);
        let mut total: i64 = 0;

        // Expressions first: multi-word idioms are the stronger signal
        let matched_expressions = self.expressions.find(&normalized);
        for expr in &matched_expressions {
            total += i64::from(expr.delta);
        }

        let matched_terms = self.lexicon.lookup(&normalized);
        for term in &matched_terms {
            total += term.contribution();
        }

        debug!(
            total,
            expressions = matched_expressions.len(),
            terms = matched_terms.len(),
            "Scored text"
        );

        ScoreTrace {
            total,
            matched_expressions,
            matched_terms,
        }
    }

    /// Score raw bytes, rejecting anything that is not UTF-8 text.
    pub fn score_bytes(&self, bytes: &[u8]) -> Result<ScoreTrace, SentimentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(self.score(text))
    }

    pub fn lexicon(&self) -> &LexiconStore {
        &self.lexicon
    }

    pub fn expressions(&self) -> &ExpressionMatcher {
        &self.expressions
    }
}
