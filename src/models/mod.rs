// Detector IA Data Models
// Educational levels, extracted documents, verdicts and wire shapes

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::services::text_processor::{split_sentences, split_words};

// ============ Educational Level ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EducationalLevel {
    #[serde(rename = "basica-1-4")]
    Basica1To4,
    #[serde(rename = "basica-5-8")]
    Basica5To8,
    #[serde(rename = "medio-1-2")]
    Medio1To2,
    #[serde(rename = "medio-3-4")]
    Medio3To4,
    #[serde(rename = "superior")]
    Superior,
}

impl EducationalLevel {
    pub const ALL: [EducationalLevel; 5] = [
        Self::Basica1To4,
        Self::Basica5To8,
        Self::Medio1To2,
        Self::Medio3To4,
        Self::Superior,
    ];

    /// Request code, as sent in the `nivel` form field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Basica1To4 => "basica-1-4",
            Self::Basica5To8 => "basica-5-8",
            Self::Medio1To2 => "medio-1-2",
            Self::Medio3To4 => "medio-3-4",
            Self::Superior => "superior",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Basica1To4 => "Educación Básica 1°-4° (7-10 años)",
            Self::Basica5To8 => "Educación Básica 5°-8° (11-14 años)",
            Self::Medio1To2 => "Educación Media 1°-2° (15-16 años)",
            Self::Medio3To4 => "Educación Media 3°-4° (17-18 años)",
            Self::Superior => "Educación Superior (18+ años)",
        }
    }
}

impl fmt::Display for EducationalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Nivel educativo no válido: {0}")]
pub struct UnknownLevelError(pub String);

impl FromStr for EducationalLevel {
    type Err = UnknownLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.code() == code)
            .ok_or_else(|| UnknownLevelError(s.trim().to_string()))
    }
}

// ============ Extracted Document ============

/// Text produced by the extractor plus the derived word and sentence lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub text: String,
    /// Lower-cased word tokens in reading order.
    pub words: Vec<String>,
    pub sentences: Vec<String>,
    pub char_count: usize,
    pub word_count: usize,
}

impl ExtractedDocument {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let words = split_words(&text);
        let sentences = split_sentences(&text);
        Self {
            char_count: text.chars().count(),
            word_count: words.len(),
            text,
            words,
            sentences,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn unique_word_count(&self) -> usize {
        self.words.iter().map(String::as_str).collect::<HashSet<_>>().len()
    }
}

// ============ Risk Level ============

/// Upper bound (exclusive) of the "Bajo" band.
pub const LOW_RISK_MAX: u8 = 40;
/// Lower bound (inclusive) of the "Alto" band.
pub const HIGH_RISK_MIN: u8 = 70;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage < LOW_RISK_MAX {
            Self::Low
        } else if percentage < HIGH_RISK_MIN {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "yellow",
            Self::High => "red",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Bajo",
            Self::Medium => "Medio",
            Self::High => "Alto",
        }
    }
}

// ============ Analysis Verdict ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyMetrics {
    /// Character count of the analyzed text.
    pub text_length: usize,
    pub unique_word_count: usize,
    /// Unique words over total words, as a percentage rounded to one decimal.
    pub vocabulary_density: f64,
}

impl VocabularyMetrics {
    pub fn from_document(doc: &ExtractedDocument) -> Self {
        let unique = doc.unique_word_count();
        let density = if doc.word_count == 0 {
            0.0
        } else {
            round1(unique as f64 / doc.word_count as f64 * 100.0)
        };
        Self {
            text_length: doc.char_count,
            unique_word_count: unique,
            vocabulary_density: density,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerdictError {
    #[error("percentage {0} is outside 0..=100")]
    OutOfRange(u8),
    #[error("a positive percentage requires at least one indicator")]
    MissingIndicators,
}

/// Outcome of one analysis. Built once and read through accessors; the
/// colour and label are always derived from `percentage`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisVerdict {
    percentage: u8,
    indicators: Vec<String>,
    validation_questions: Vec<String>,
    vocabulary_metrics: VocabularyMetrics,
    analyzed_with_ai: bool,
    status_info: String,
}

impl AnalysisVerdict {
    pub fn new(
        percentage: u8,
        indicators: Vec<String>,
        validation_questions: Vec<String>,
        vocabulary_metrics: VocabularyMetrics,
        analyzed_with_ai: bool,
        status_info: impl Into<String>,
    ) -> Result<Self, VerdictError> {
        if percentage > 100 {
            return Err(VerdictError::OutOfRange(percentage));
        }
        if percentage > 0 && indicators.is_empty() {
            return Err(VerdictError::MissingIndicators);
        }
        Ok(Self {
            percentage,
            indicators,
            validation_questions,
            vocabulary_metrics,
            analyzed_with_ai,
            status_info: status_info.into(),
        })
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    pub fn risk(&self) -> RiskLevel {
        RiskLevel::from_percentage(self.percentage)
    }

    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn validation_questions(&self) -> &[String] {
        &self.validation_questions
    }

    pub fn vocabulary_metrics(&self) -> &VocabularyMetrics {
        &self.vocabulary_metrics
    }

    pub fn analyzed_with_ai(&self) -> bool {
        self.analyzed_with_ai
    }

    pub fn status_info(&self) -> &str {
        &self.status_info
    }
}

// ============ Wire Shapes ============

/// JSON body returned by `POST /analizar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub porcentaje: u8,
    pub color: String,
    pub label: String,
    pub indicadores: Vec<String>,
    pub preguntas: Vec<String>,
    pub filename: String,
    pub analizado_con_ia: bool,
    pub nivel_educativo: String,
    pub error_info: String,
    pub longitud_texto: usize,
    pub palabras_unicas: usize,
    pub densidad_vocabulario: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_codes_round_trip() {
        for level in EducationalLevel::ALL {
            assert_eq!(level.code().parse::<EducationalLevel>(), Ok(level));
        }
        assert_eq!(" Medio-3-4 ".parse::<EducationalLevel>(), Ok(EducationalLevel::Medio3To4));
        assert!("universidad".parse::<EducationalLevel>().is_err());
    }

    #[test]
    fn test_level_serde_uses_codes() {
        let json = serde_json::to_string(&EducationalLevel::Basica5To8).unwrap();
        assert_eq!(json, "\"basica-5-8\"");
    }

    #[test]
    fn test_risk_boundaries() {
        assert_eq!(RiskLevel::from_percentage(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_percentage(39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_percentage(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_percentage(69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_percentage(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_percentage(100), RiskLevel::High);
        assert_eq!(RiskLevel::from_percentage(39).color(), "green");
        assert_eq!(RiskLevel::from_percentage(40).label(), "Medio");
        assert_eq!(RiskLevel::from_percentage(70).color(), "red");
    }

    #[test]
    fn test_extracted_document_counts() {
        let doc = ExtractedDocument::from_text("Hola mundo. Hola otra vez!");
        assert_eq!(doc.word_count, 5);
        assert_eq!(doc.sentences.len(), 2);
        assert_eq!(doc.unique_word_count(), 4);
        assert_eq!(doc.char_count, 26);
    }

    #[test]
    fn test_vocabulary_metrics_case_insensitive() {
        let doc = ExtractedDocument::from_text("Casa casa CASA perro");
        let metrics = VocabularyMetrics::from_document(&doc);
        assert_eq!(metrics.unique_word_count, 2);
        assert_eq!(metrics.vocabulary_density, 50.0);
    }

    #[test]
    fn test_verdict_rejects_invariant_violations() {
        let metrics = VocabularyMetrics::from_document(&ExtractedDocument::from_text("uno dos"));
        assert_eq!(
            AnalysisVerdict::new(101, vec!["x".into()], vec![], metrics.clone(), false, ""),
            Err(VerdictError::OutOfRange(101))
        );
        assert_eq!(
            AnalysisVerdict::new(10, vec![], vec![], metrics.clone(), false, ""),
            Err(VerdictError::MissingIndicators)
        );
        let zero = AnalysisVerdict::new(0, vec![], vec![], metrics, false, "ok").unwrap();
        assert_eq!(zero.risk(), RiskLevel::Low);
    }
}
