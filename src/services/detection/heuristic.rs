// Heuristic Analyzer
// Deterministic fallback scoring over stylometric features.
//
// Feature-additive model: start from a neutral baseline, add bounded weights
// for each suspicious signal, cap short documents, clamp to [0, 100].

use thiserror::Error;
use tracing::debug;

use crate::models::{AnalysisVerdict, EducationalLevel, ExtractedDocument, VerdictError, VocabularyMetrics};
use crate::services::text_processor::{compute_stylometry, TextFeatures};

use super::questions::questions_for;
use super::sensitivity::{level_indicator, level_profile};

pub const BASELINE_PERCENTAGE: i32 = 30;

const UNIFORM_CV_MAX: f64 = 0.25;
const UNIFORM_WEIGHT: i32 = 15;

const DENSITY_MIN_WORDS: usize = 30;
const DENSITY_FLOOR: f64 = 20.0;
const ADVANCED_VOCABULARY_WEIGHT: i32 = 15;

const PUNCTUATION_MIN_MARKS: usize = 3;
const PUNCTUATION_VARIETY_MAX: f64 = 0.5;
const PUNCTUATION_WEIGHT: i32 = 10;

const REPETITION_RATE_MIN: f64 = 0.30;
const REPETITION_WEIGHT: i32 = 25;
const HEAVY_REPETITION_RATE: f64 = 0.45;
const HEAVY_REPETITION_BONUS: i32 = 10;

/// Documents below this word count cannot be judged reliably.
pub const MIN_WORDS: usize = 10;
pub const SHORT_TEXT_CAP: i32 = 35;

pub const STATUS_HEURISTIC: &str = "Análisis automático (heurístico)";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HeuristicError {
    /// The caller must check for empty extraction before invoking the analyzer.
    #[error("insufficient text: the heuristic analyzer needs at least one word")]
    InsufficientText,
    #[error(transparent)]
    Verdict(#[from] VerdictError),
}

/// Observations that justify part of the score.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Signal {
    UniformStructure,
    AdvancedVocabulary,
    WeakVocabularySignal,
    LowPunctuationVariety,
    Repetition,
    ShortText,
}

impl Signal {
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::UniformStructure => "Estructura muy regular",
            Self::AdvancedVocabulary => "Vocabulario avanzado para la edad",
            Self::WeakVocabularySignal => "Vocabulario demasiado reducido: señal insuficiente",
            Self::LowPunctuationVariety => "Puntuación poco variada",
            Self::Repetition => "Repetición de estructuras",
            Self::ShortText => "Texto muy corto",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicScore {
    pub percentage: u8,
    /// Fired signals in detection order.
    pub signals: Vec<Signal>,
    pub short_text: bool,
}

/// Score pre-computed features for a level
pub fn score_features(features: &TextFeatures, level: EducationalLevel) -> HeuristicScore {
    let profile = level_profile(level);
    let mut signals: Vec<Signal> = Vec::new();
    let mut score = BASELINE_PERCENTAGE;

    // 1. Sentence-length regularity
    if let Some(cv) = features.sentence_length_cv {
        if cv < UNIFORM_CV_MAX {
            score += UNIFORM_WEIGHT;
            signals.push(Signal::UniformStructure);
        }
    }

    // 2. Vocabulary density: raw ratio for the floor, windowed ratio against the level ceiling
    if features.vocabulary_density < DENSITY_FLOOR {
        signals.push(Signal::WeakVocabularySignal);
    } else if features.word_count >= DENSITY_MIN_WORDS
        && features.windowed_density > profile.density_ceiling
    {
        score += ADVANCED_VOCABULARY_WEIGHT;
        signals.push(Signal::AdvancedVocabulary);
    }

    // 3. Punctuation variety
    if let Some(variety) = features.punctuation_variety {
        if features.punctuation_total >= PUNCTUATION_MIN_MARKS && variety < PUNCTUATION_VARIETY_MAX {
            score += PUNCTUATION_WEIGHT;
            signals.push(Signal::LowPunctuationVariety);
        }
    }

    // 4. Repetition within the look-back window
    if features.repetition_rate >= REPETITION_RATE_MIN {
        score += REPETITION_WEIGHT;
        if features.repetition_rate >= HEAVY_REPETITION_RATE {
            score += HEAVY_REPETITION_BONUS;
        }
        signals.push(Signal::Repetition);
    }

    // 5. Short documents are capped regardless of other signals
    let short_text = features.word_count < MIN_WORDS;
    if short_text {
        score = score.min(SHORT_TEXT_CAP);
        signals.push(Signal::ShortText);
    }

    HeuristicScore {
        percentage: score.clamp(0, 100) as u8,
        signals,
        short_text,
    }
}

/// Analyze a document without any external call
pub fn analyze_heuristic(
    doc: &ExtractedDocument,
    level: EducationalLevel,
) -> Result<AnalysisVerdict, HeuristicError> {
    analyze_heuristic_with_reason(doc, level, None)
}

/// Analyze a document, recording why the heuristic path was taken
pub fn analyze_heuristic_with_reason(
    doc: &ExtractedDocument,
    level: EducationalLevel,
    fallback_reason: Option<&str>,
) -> Result<AnalysisVerdict, HeuristicError> {
    if doc.is_empty() {
        return Err(HeuristicError::InsufficientText);
    }

    let features = compute_stylometry(doc);
    let score = score_features(&features, level);
    debug!(
        words = features.word_count,
        sentences = features.sentence_count,
        cv = ?features.sentence_length_cv,
        density = features.vocabulary_density,
        windowed = features.windowed_density,
        variety = ?features.punctuation_variety,
        repetition = features.repetition_rate,
        percentage = score.percentage,
        "[HEURISTIC] features scored"
    );

    let mut indicators: Vec<String> = score.signals.iter().map(|s| s.indicator().to_string()).collect();
    indicators.push(level_indicator(level));

    let questions = questions_for(&score.signals);
    let status = status_info(fallback_reason, score.short_text);

    let verdict = AnalysisVerdict::new(
        score.percentage,
        indicators,
        questions,
        VocabularyMetrics::from_document(doc),
        false,
        status,
    )?;
    Ok(verdict)
}

fn status_info(fallback_reason: Option<&str>, short_text: bool) -> String {
    let base = match fallback_reason {
        Some(reason) => format!("Fallback: IA no disponible ({})", reason),
        None => STATUS_HEURISTIC.to_string(),
    };
    if short_text {
        format!(
            "{}. Texto insuficiente: menos de {} palabras, el resultado no es fiable",
            base, MIN_WORDS
        )
    } else {
        base
    }
}
