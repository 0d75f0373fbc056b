//! Lexicon Store.
//!
//! Weighted terms and phrases matched as plain substrings of the normalized
//! text. There is no word-boundary anchoring: "no me gusta" matches as a
//! phrase, and a short form such as "mal" also fires inside "animal". That
//! imprecision is accepted behavior.

use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use validator::Validate;

use crate::error::ConfigError;

/// Direction of a lexicon entry's contribution to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Positive => write!(f, "positive"),
            Polarity::Negative => write!(f, "negative"),
        }
    }
}

impl Polarity {
    /// Signed contribution of `weight` under this polarity
    pub fn apply(&self, weight: u32) -> i64 {
        match self {
            Polarity::Positive => i64::from(weight),
            Polarity::Negative => -i64::from(weight),
        }
    }
}

/// One weighted term or phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LexiconEntry {
    /// One or more words, case-folded at load time, accents preserved
    #[serde(rename = "term")]
    #[validate(length(min = 1))]
    pub surface_form: String,
    pub polarity: Polarity,
    #[validate(range(min = 1))]
    pub weight: u32,
}

impl LexiconEntry {
    pub fn new(surface_form: impl Into<String>, polarity: Polarity, weight: u32) -> Self {
        Self {
            surface_form: surface_form.into(),
            polarity,
            weight,
        }
    }

    pub fn positive(surface_form: impl Into<String>, weight: u32) -> Self {
        Self::new(surface_form, Polarity::Positive, weight)
    }

    pub fn negative(surface_form: impl Into<String>, weight: u32) -> Self {
        Self::new(surface_form, Polarity::Negative, weight)
    }
}

/// A lexicon entry that fired on a text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMatch {
    pub surface_form: String,
    pub polarity: Polarity,
    pub weight: u32,
}

impl TermMatch {
    /// Signed score contribution
    pub fn contribution(&self) -> i64 {
        self.polarity.apply(self.weight)
    }
}

/// Immutable store of lexicon entries, kept in declaration order
#[derive(Debug, Clone)]
pub struct LexiconStore {
    entries: Vec<LexiconEntry>,
    automaton: AhoCorasick,
}

impl LexiconStore {
    /// Build the store, rejecting duplicate (surface form, polarity) pairs.
    ///
    /// Surface forms are lowercased before the duplicate check, so
    /// "Terrible" and "terrible" collide. The same surface form may appear
    /// once per polarity.
    pub fn new(entries: Vec<LexiconEntry>) -> Result<Self, ConfigError> {
        let mut seen: HashSet<(String, Polarity)> = HashSet::with_capacity(entries.len());
        let mut folded = Vec::with_capacity(entries.len());

        for entry in entries {
            entry.validate()?;
            let surface_form = entry.surface_form.to_lowercase();
            if !seen.insert((surface_form.clone(), entry.polarity)) {
                return Err(ConfigError::DuplicateTerm {
                    surface_form,
                    polarity: entry.polarity,
                });
            }
            folded.push(LexiconEntry {
                surface_form,
                ..entry
            });
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(folded.iter().map(|e| e.surface_form.as_str()))
            .map_err(|e| ConfigError::Validation(format!("Failed to build lexicon matcher: {e}")))?;

        Ok(Self {
            entries: folded,
            automaton,
        })
    }

    /// Every entry whose surface form occurs in `normalized_text`.
    ///
    /// An entry counts once no matter how often it occurs. Overlapping
    /// entries ("no sirve" and "sirve") both fire. Results follow
    /// declaration order.
    pub fn lookup(&self, normalized_text: &str) -> Vec<TermMatch> {
        if self.entries.is_empty() || normalized_text.is_empty() {
            return vec![];
        }

        let mut fired = vec![false; self.entries.len()];
        for mat in self.automaton.find_overlapping_iter(normalized_text) {
            fired[mat.pattern().as_usize()] = true;
        }

        self.entries
            .iter()
            .zip(fired)
            .filter(|(_, hit)| *hit)
            .map(|(entry, _)| TermMatch {
                surface_form: entry.surface_form.clone(),
                polarity: entry.polarity,
                weight: entry.weight,
            })
            .collect()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of entries with the given polarity
    pub fn count(&self, polarity: Polarity) -> usize {
        self.entries.iter().filter(|e| e.polarity == polarity).count()
    }
}
