//! Expression Matcher.
//!
//! Idiomatic expressions encoded as case-insensitive regex patterns, each
//! carrying a fixed score delta. Patterns are compiled once at load time and
//! evaluated with a single search each. Accent variants are spelled out in
//! the pattern itself (`compr[ée]`), since normalization keeps diacritics.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ConfigError;

/// Upper bound on the compiled size of a single pattern
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Declarative expression rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExpressionRule {
    #[validate(length(min = 1))]
    pub pattern: String,
    pub delta: i32,
}

impl ExpressionRule {
    pub fn new(pattern: impl Into<String>, delta: i32) -> Self {
        Self {
            pattern: pattern.into(),
            delta,
        }
    }
}

/// An expression that fired on a text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionMatch {
    /// Position of the rule in the configured list
    pub id: usize,
    pub pattern: String,
    pub delta: i32,
}

struct CompiledRule {
    rule: ExpressionRule,
    regex: Regex,
}

/// Pre-compiled expression rules in declaration order
pub struct ExpressionMatcher {
    rules: Vec<CompiledRule>,
}

impl std::fmt::Debug for ExpressionMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionMatcher")
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .finish()
    }
}

impl ExpressionMatcher {
    /// Compile every rule. Any failure rejects the whole set.
    pub fn new(rules: Vec<ExpressionRule>) -> Result<Self, ConfigError> {
        let rules = rules
            .into_iter()
            .map(|rule| -> Result<CompiledRule, ConfigError> {
                rule.validate()?;
                let regex = compile(&rule.pattern)?;
                Ok(CompiledRule { rule, regex })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Rules that fire on `normalized_text`, each at most once.
    pub fn find(&self, normalized_text: &str) -> Vec<ExpressionMatch> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, compiled)| compiled.regex.is_match(normalized_text))
            .map(|(id, compiled)| ExpressionMatch {
                id,
                pattern: compiled.rule.pattern.clone(),
                delta: compiled.rule.delta,
            })
            .collect()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|c| c.rule.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    if nests_unbounded_repetition(pattern) {
        return Err(ConfigError::BacktrackingPattern {
            pattern: pattern.to_string(),
        });
    }

    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Detects a group that contains unbounded repetition and is itself
/// repeated without bound, e.g. `(a+)+`, `(?:\w*\s)*`, `(x{2,})+`.
///
/// Escapes and character classes are skipped. Malformed patterns return
/// false here and are left for the regex compiler to reject.
///
/// The check is syntactic and conservative: it does not look at whether a
/// literal separates the iterations, so unambiguous shapes such as
/// `\d+(,\d+)*` are rejected too. Write those with a bounded outer
/// repetition (`\d+(,\d+){0,16}`) or as a flat pattern.
fn nests_unbounded_repetition(pattern: &str) -> bool {
    let chars: Vec<char> = pattern.chars().collect();
    // One flag per open group: does its body repeat without bound?
    let mut groups: Vec<bool> = vec![false];
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 2;
                if let Some(len) = unbounded_quantifier_at(&chars, i) {
                    mark_unbounded(&mut groups);
                    i += len;
                }
                continue;
            }
            '[' => {
                i = skip_class(&chars, i);
                if let Some(len) = unbounded_quantifier_at(&chars, i) {
                    mark_unbounded(&mut groups);
                    i += len;
                }
                continue;
            }
            '(' => groups.push(false),
            ')' => {
                let inner = if groups.len() > 1 {
                    groups.pop().unwrap_or(false)
                } else {
                    false
                };
                if let Some(len) = unbounded_quantifier_at(&chars, i + 1) {
                    if inner {
                        return true;
                    }
                    mark_unbounded(&mut groups);
                    i += len;
                } else if inner {
                    mark_unbounded(&mut groups);
                }
            }
            _ => {
                if let Some(len) = unbounded_quantifier_at(&chars, i + 1) {
                    mark_unbounded(&mut groups);
                    i += len;
                }
            }
        }
        i += 1;
    }

    false
}

fn mark_unbounded(groups: &mut [bool]) {
    if let Some(top) = groups.last_mut() {
        *top = true;
    }
}

/// Length of an unbounded quantifier (`*`, `+`, `{n,}`) starting at `i`,
/// including a trailing lazy/possessive marker.
fn unbounded_quantifier_at(chars: &[char], i: usize) -> Option<usize> {
    let len = match chars.get(i)? {
        '*' | '+' => 1,
        '{' => {
            let close = chars[i..].iter().position(|&c| c == '}')? + i;
            let body: String = chars[i + 1..close].iter().collect();
            let (min, max) = body.split_once(',')?;
            if min.is_empty() || !min.chars().all(|c| c.is_ascii_digit()) || !max.trim().is_empty() {
                return None;
            }
            close - i + 1
        }
        _ => return None,
    };
    match chars.get(i + len) {
        Some('?') | Some('+') => Some(len + 1),
        _ => Some(len),
    }
}

/// Index just past the character class opening at `start`.
fn skip_class(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    if chars.get(i) == Some(&'^') {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    let mut depth = 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}
