//! Property-based tests for the heuristic analyzer
//!
//! Bounds, determinism, monotonicity and label bands.

use detector_ia_lib::models::{EducationalLevel, ExtractedDocument, RiskLevel};
use detector_ia_lib::services::detection::{analyze_heuristic, score_features};
use detector_ia_lib::services::text_processor::TextFeatures;
use proptest::prelude::*;

const VOCABULARY: &[&str] = &[
    "la", "inteligencia", "artificial", "es", "una", "herramienta", "útil", "ayer", "fui",
    "al", "colegio", "con", "mi", "hermana", "y", "jugamos", "fútbol", "tecnología",
    "sociedad", "importante", "porque", "creo", "que", "aprender", "perro", "casa",
];

fn level() -> impl Strategy<Value = EducationalLevel> {
    prop::sample::select(EducationalLevel::ALL.to_vec())
}

/// Word soup with sentence and comma punctuation sprinkled in.
fn spanish_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (prop::sample::select(VOCABULARY.to_vec()), prop::sample::select(vec!["", "", "", ",", ".", "?"])),
        1..160,
    )
    .prop_map(|tokens| {
        tokens
            .into_iter()
            .map(|(word, mark)| format!("{}{}", word, mark))
            .collect::<Vec<_>>()
            .join(" ")
    })
}

fn features() -> impl Strategy<Value = TextFeatures> {
    (
        1usize..400,
        1usize..30,
        prop::option::of(0.0f64..2.0),
        1.0f64..100.0,
        50.0f64..100.0,
        0usize..60,
        prop::option::of(0.05f64..1.0),
    )
        .prop_map(|(word_count, sentence_count, cv, density, windowed, punct, variety)| TextFeatures {
            word_count,
            sentence_count,
            avg_sentence_length: word_count as f64 / sentence_count as f64,
            sentence_length_cv: cv,
            vocabulary_density: density,
            windowed_density: windowed,
            punctuation_total: punct,
            punctuation_distinct: punct.min(4),
            punctuation_variety: if punct == 0 { None } else { variety },
            repetition_rate: 0.0,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn percentage_is_bounded_and_explained(text in spanish_text(), level in level()) {
        let doc = ExtractedDocument::from_text(text);
        let verdict = analyze_heuristic(&doc, level).unwrap();
        prop_assert!(verdict.percentage() <= 100);
        prop_assert!(!verdict.indicators().is_empty());
        prop_assert!(verdict.validation_questions().len() <= 3);
        prop_assert!(!verdict.analyzed_with_ai());
    }

    #[test]
    fn analysis_is_deterministic(text in spanish_text(), level in level()) {
        let doc = ExtractedDocument::from_text(text);
        prop_assert_eq!(analyze_heuristic(&doc, level), analyze_heuristic(&doc, level));
    }

    #[test]
    fn more_repetition_never_lowers_the_score(
        base in features(),
        low in 0.0f64..1.0,
        delta in 0.0f64..1.0,
        level in level(),
    ) {
        let mut less = base.clone();
        less.repetition_rate = low;
        let mut more = base;
        more.repetition_rate = (low + delta).min(1.0);
        prop_assert!(score_features(&more, level).percentage >= score_features(&less, level).percentage);
    }

    #[test]
    fn short_texts_stay_below_medium(words in prop::collection::vec(prop::sample::select(VOCABULARY.to_vec()), 1..10), level in level()) {
        let doc = ExtractedDocument::from_text(words.join(" "));
        let verdict = analyze_heuristic(&doc, level).unwrap();
        prop_assert!(verdict.percentage() < 40);
    }

    #[test]
    fn label_follows_fixed_bands(percentage in 0u8..=100) {
        let expected = if percentage < 40 {
            RiskLevel::Low
        } else if percentage < 70 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };
        prop_assert_eq!(RiskLevel::from_percentage(percentage), expected);
    }
}

#[test]
fn label_boundaries() {
    assert_eq!(RiskLevel::from_percentage(39).label(), "Bajo");
    assert_eq!(RiskLevel::from_percentage(40).label(), "Medio");
    assert_eq!(RiskLevel::from_percentage(69).label(), "Medio");
    assert_eq!(RiskLevel::from_percentage(70).label(), "Alto");
}
