//! Scoring pipeline tests
//!
//! Properties that must hold for any rule set, plus the reference scenarios
//! with hand-computed totals.

use crate::config::{SentimentConfig, ThresholdsConfig};
use crate::error::ConfigError;
use crate::sentiment::{
    classify, ExpressionMatcher, ExpressionRule, Label, LexiconEntry, LexiconStore, Preset,
    ScoringEngine, SentimentAnalyzer, Thresholds,
};

fn config(lexicon: Vec<LexiconEntry>, expressions: Vec<ExpressionRule>) -> SentimentConfig {
    SentimentConfig {
        thresholds: ThresholdsConfig {
            positive_min: 3,
            negative_max: -2,
        },
        lexicon,
        expressions,
    }
}

fn reference_analyzer() -> SentimentAnalyzer {
    SentimentAnalyzer::from_config(config(
        vec![
            LexiconEntry::negative("terrible", 3),
            LexiconEntry::negative("no sirve", 3),
            LexiconEntry::positive("excelente", 3),
            LexiconEntry::positive("buen", 2),
        ],
        vec![ExpressionRule::new(r"no la volver[é|e] a comprar", -3)],
    ))
    .unwrap()
}

const REVIEWS: &[&str] = &[
    "El empaque es terrible, no la volveré a comprar porque no sirve el envase",
    "Excelente base, buen cubrimiento",
    "Es un producto más, no está mal",
    "Me encanta, es perfecto y lo recomiendo",
    "No me gustó, me ardió la piel y me salieron granos",
    "Es mucho más oscuro que mi tono, horrible",
    "Cumple, pero queda la piel pasteluda",
    "",
    "   ",
    "NO FUNCIONA, DECEPCIONANTE",
];

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_negative_scenario() {
        let report = reference_analyzer()
            .analyze("El empaque es terrible, no la volveré a comprar porque no sirve el envase");

        assert_eq!(report.total, -9);
        assert_eq!(report.label, Label::Negative);
        assert_eq!(report.magnitude, 9);
        assert_eq!(report.matched_expressions.len(), 1);
        assert_eq!(report.matched_terms.len(), 2);
    }

    #[test]
    fn test_positive_scenario() {
        let report = reference_analyzer().analyze("Excelente base, buen cubrimiento");

        assert_eq!(report.total, 5);
        assert_eq!(report.label, Label::Positive);
        assert_eq!(report.magnitude, 5);
    }

    #[test]
    fn test_neutral_scenario_minimal_config() {
        let analyzer = SentimentAnalyzer::from_config(config(vec![], vec![])).unwrap();
        let report = analyzer.analyze("Es un producto más, no está mal");

        assert_eq!(report.total, 0);
        assert_eq!(report.label, Label::Neutral);
        assert_eq!(report.magnitude, 0);
        assert!(report.matched_expressions.is_empty());
        assert!(report.matched_terms.is_empty());
    }

    #[test]
    fn test_phrase_covered_by_both_layers_counts_twice() {
        // "no sirve" is both an expression (-3) and a lexicon phrase (-2)
        let analyzer = SentimentAnalyzer::from_preset(Preset::Original).unwrap();
        let report = analyzer.analyze("no sirve");

        assert_eq!(report.total, -5);
        assert_eq!(report.matched_expressions.len(), 1);
        assert_eq!(report.matched_terms.len(), 1);
    }

    #[test]
    fn test_preset_reviews() {
        let analyzer = SentimentAnalyzer::from_preset(Preset::Original).unwrap();

        // expression -3 plus "horrible" both as expression and term
        let report = analyzer.analyze("Es mucho más oscuro que mi tono, horrible");
        assert_eq!(report.total, -3 - 3 - 2 - 1);
        assert_eq!(report.label, Label::Negative);

        let report = analyzer.analyze("Me encanta, es perfecto y lo recomiendo");
        assert_eq!(report.total, 5);
        assert_eq!(report.label, Label::Positive);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let analyzer = SentimentAnalyzer::from_preset(Preset::Original).unwrap();
        for text in REVIEWS {
            assert_eq!(
                analyzer.engine().score(text),
                analyzer.engine().score(text),
                "non-deterministic trace for '{}'",
                text
            );
        }
    }

    #[test]
    fn test_case_insensitivity() {
        let analyzer = SentimentAnalyzer::from_preset(Preset::Original).unwrap();
        for text in REVIEWS {
            assert_eq!(
                analyzer.engine().score(text),
                analyzer.engine().score(&text.to_uppercase()),
                "case-sensitive trace for '{}'",
                text
            );
        }
    }

    #[test]
    fn test_threshold_boundaries() {
        let thresholds = Thresholds::new(3, -2).unwrap();
        let lexicon = LexiconStore::new(vec![
            LexiconEntry::positive("uno", 1),
            LexiconEntry::positive("dos", 2),
            LexiconEntry::negative("menos", 1),
            LexiconEntry::negative("doble", 2),
        ])
        .unwrap();
        let engine = ScoringEngine::new(lexicon, ExpressionMatcher::new(vec![]).unwrap());

        let cases = [
            ("uno dos", 3, Label::Positive, 3),
            ("dos", 2, Label::Neutral, 0),
            ("doble", -2, Label::Negative, 2),
            ("menos", -1, Label::Neutral, 0),
        ];

        for (text, total, label, magnitude) in cases {
            let trace = engine.score(text);
            assert_eq!(trace.total, total, "total for '{}'", text);
            let result = classify(&trace, &thresholds);
            assert_eq!(result.label, label, "label for '{}'", text);
            assert_eq!(result.magnitude, magnitude, "magnitude for '{}'", text);
        }
    }

    #[test]
    fn test_monotonicity_of_positive_terms() {
        // No negative rule contains a positive term, so no match can span the join
        let analyzer = SentimentAnalyzer::from_config(config(
            vec![
                LexiconEntry::positive("excelente", 3),
                LexiconEntry::positive("perfecto", 2),
                LexiconEntry::positive("agradable", 1),
                LexiconEntry::negative("terrible", 3),
                LexiconEntry::negative("horrible", 2),
                LexiconEntry::negative("decepcionante", 2),
            ],
            vec![
                ExpressionRule::new(r"no la volver[é|e] a comprar", -3),
                ExpressionRule::new(r"no me gust[oó]", -3),
                ExpressionRule::new(r"no funciona", -3),
            ],
        ))
        .unwrap();

        for text in REVIEWS {
            let before = analyzer.analyze(text);
            for term in ["excelente", "perfecto", "agradable"] {
                let after = analyzer.analyze(&format!("{} {}", text, term));
                assert!(
                    after.total >= before.total,
                    "appending '{}' to '{}' lowered the total",
                    term,
                    text
                );
                if before.label == Label::Neutral {
                    assert_ne!(after.label, Label::Negative, "'{}' + '{}'", text, term);
                }
            }
        }
    }

    #[test]
    fn test_appended_term_can_complete_negative_expression() {
        let analyzer = SentimentAnalyzer::from_preset(Preset::Original).unwrap();

        let before = analyzer.analyze("me gusta, pero no");
        assert_eq!(before.total, 0);
        assert_eq!(before.label, Label::Neutral);

        // "funciona" is +1, but it also completes "no funciona" (-3)
        let after = analyzer.analyze("me gusta, pero no funciona");
        assert_eq!(after.total, -2);
        assert_eq!(after.label, Label::Negative);
        assert_eq!(after.matched_expressions.len(), 1);
        assert_eq!(after.matched_terms.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let analyzer = reference_analyzer();
        for text in ["", " ", "\n\t "] {
            let report = analyzer.analyze(text);
            assert_eq!(report.total, 0);
            assert!(report.matched_expressions.is_empty());
            assert!(report.matched_terms.is_empty());
            assert_eq!(report.label, Label::Neutral);
            assert_eq!(report.magnitude, 0);
        }
    }

    #[test]
    fn test_config_rejection() {
        let err = LexiconStore::new(vec![
            LexiconEntry::negative("terrible", 3),
            LexiconEntry::negative("terrible", 4),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTerm { .. }));

        let err = Thresholds::new(2, 2).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThresholds { .. }));
    }

    #[test]
    fn test_any_bad_rule_blocks_construction() {
        let bad_pattern = config(
            vec![LexiconEntry::positive("bueno", 1)],
            vec![ExpressionRule::new("(a+)+", -3)],
        );
        assert!(matches!(
            SentimentAnalyzer::from_config(bad_pattern),
            Err(ConfigError::BacktrackingPattern { .. })
        ));

        let duplicate = config(
            vec![
                LexiconEntry::negative("decepcionante", 2),
                LexiconEntry::negative("decepcionante", 3),
            ],
            vec![],
        );
        assert!(matches!(
            SentimentAnalyzer::from_config(duplicate),
            Err(ConfigError::DuplicateTerm { .. })
        ));
    }
}

#[cfg(test)]
mod batch_tests {
    use super::*;
    use crate::sentiment::analyzer::PARALLEL_THRESHOLD;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_batch_matches_single_calls() {
        let analyzer = SentimentAnalyzer::from_preset(Preset::Original).unwrap();
        let batch = analyzer.analyze_batch(REVIEWS);

        assert_eq!(batch.len(), REVIEWS.len());
        for (report, text) in batch.iter().zip(REVIEWS) {
            assert_eq!(report.text, *text);
            let trace = analyzer.engine().score(text);
            assert_eq!(report.total, trace.total);
            assert_eq!(report.matched_expressions, trace.matched_expressions);
            assert_eq!(report.matched_terms, trace.matched_terms);
        }
    }

    #[test]
    fn test_large_batch_preserves_order() {
        let analyzer = SentimentAnalyzer::from_preset(Preset::Original).unwrap();
        let texts: Vec<String> = (0..PARALLEL_THRESHOLD * 4)
            .map(|i| REVIEWS[i % REVIEWS.len()].to_string())
            .collect();

        let batch = analyzer.analyze_batch(&texts);
        assert_eq!(batch.len(), texts.len());
        for (report, text) in batch.iter().zip(&texts) {
            assert_eq!(&report.text, text);
            assert_eq!(report.label, analyzer.analyze(text).label);
        }
    }

    #[test]
    fn test_values_batch_isolates_bad_items() {
        let analyzer = SentimentAnalyzer::from_preset(Preset::Original).unwrap();
        let values = vec![json!("excelente, perfecto"), json!(null), json!("horrible"), json!(7)];

        let results = analyzer.analyze_values(&values);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().label, Label::Positive);
        assert!(results[1].as_ref().unwrap_err().is_input_error());
        assert_eq!(results[2].as_ref().unwrap().label, Label::Negative);
        assert!(results[3].is_err());
    }

    #[test]
    fn test_distribution() {
        let analyzer = SentimentAnalyzer::from_preset(Preset::Original).unwrap();
        let dist = analyzer.distribution(REVIEWS);
        assert_eq!(dist.total(), REVIEWS.len());
        assert_eq!(
            dist.count(Label::Positive) + dist.count(Label::Negative) + dist.count(Label::Neutral),
            REVIEWS.len()
        );
    }

    #[test]
    fn test_shared_across_threads() {
        let analyzer = Arc::new(SentimentAnalyzer::from_preset(Preset::Original).unwrap());
        let expected = analyzer.engine().score(REVIEWS[0]);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let analyzer = Arc::clone(&analyzer);
                thread::spawn(move || analyzer.engine().score(REVIEWS[0]))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
