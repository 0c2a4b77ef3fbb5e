// LLM Analyzer
// Asks Gemini for a verdict and validates the answer before it leaves this module

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{AnalysisVerdict, EducationalLevel, ExtractedDocument, VocabularyMetrics};
use crate::services::config_store::AiConfig;
use crate::services::providers::{ProviderClient, ProviderError};

use super::questions::pad_questions;

pub const STATUS_AI_SUCCESS: &str = "Análisis exitoso con IA";

#[derive(Error, Debug)]
pub enum AiFailure {
    #[error("AI analysis disabled")]
    Disabled,
    #[error("missing API key")]
    MissingApiKey,
    #[error("AI call exceeded {0}s")]
    Timeout(u64),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("empty model response")]
    EmptyResponse,
    #[error("invalid JSON in model response: {0}")]
    InvalidJson(String),
    #[error("invalid verdict: {0}")]
    InvalidVerdict(String),
}

impl AiFailure {
    /// Short Spanish reason shown to the user in `error_info`
    pub fn diagnosis(&self) -> String {
        match self {
            Self::Disabled => "Análisis con IA desactivado".to_string(),
            Self::MissingApiKey => "API Key no configurada".to_string(),
            Self::Timeout(_) => timeout_message(),
            Self::EmptyResponse | Self::Provider(ProviderError::MissingContent) => {
                "Gemini devolvió respuesta vacía".to_string()
            }
            Self::InvalidJson(_) | Self::Provider(ProviderError::JsonError(_)) => {
                "Error de formato JSON - Respuesta malformada de Gemini".to_string()
            }
            Self::InvalidVerdict(detail) => format!("Respuesta de Gemini no válida: {}", detail),
            Self::Provider(ProviderError::ApiError { status, message }) => {
                diagnose_status(*status, message)
            }
            Self::Provider(ProviderError::HttpError(e)) => {
                if e.is_timeout() {
                    timeout_message()
                } else if e.is_connect() || e.is_request() {
                    "Error de conexión - Problema de red o internet".to_string()
                } else if e.is_decode() {
                    "Error de formato JSON - Respuesta malformada de Gemini".to_string()
                } else {
                    format!("Error desconocido: {}", e)
                }
            }
        }
    }
}

fn timeout_message() -> String {
    "Timeout - La request tardó demasiado en responder".to_string()
}

fn diagnose_status(status: u16, message: &str) -> String {
    let lower = message.to_lowercase();
    match status {
        401 | 403 => "No autorizado - API Key incorrecta o expirada".to_string(),
        400 if lower.contains("api key") || lower.contains("api_key") => {
            "API Key inválida - Verifica tu clave de Google AI".to_string()
        }
        429 if lower.contains("quota") => {
            "Cuota de API alcanzada - Has excedido el límite de requests".to_string()
        }
        429 => "Límite de velocidad alcanzado - Demasiadas requests por minuto".to_string(),
        404 => "Modelo no disponible - Error con el modelo de IA".to_string(),
        _ => format!("Error desconocido: HTTP {}", status),
    }
}

/// Raw shape requested from the model; validated before becoming a verdict.
#[derive(Debug, Deserialize)]
struct RawAiVerdict {
    porcentaje: Option<f64>,
    #[serde(default)]
    indicadores: Vec<String>,
    #[serde(default)]
    preguntas: Vec<String>,
}

pub fn build_prompt(text: &str, level: EducationalLevel, max_chars: usize) -> String {
    let excerpt: String = text.chars().take(max_chars).collect();
    let level_desc = level.description();
    format!(
        r#"Analiza este texto de un estudiante de {level_desc} para detectar si fue creado con IA.

Devuelve SOLO un JSON simple con esta estructura:
{{
    "porcentaje": [0-100, donde 0=humano, 100=IA],
    "indicadores": ["indicador1", "indicador2", "indicador3"],
    "preguntas": ["pregunta1", "pregunta2", "pregunta3"]
}}

Indicadores de IA a buscar:
- Vocabulario muy avanzado para la edad
- Estructura demasiado perfecta
- Falta de errores típicos de la edad
- Repetición de patrones
- Complejidad sintáctica inusual

Indicadores de escritura humana:
- Errores gramaticales típicos de la edad
- Vocabulario apropiado para el nivel
- Expresiones personales
- Inconsistencias naturales

Preguntas según nivel {level_desc}:
- "¿Puedes explicar con tus propias palabras?"
- "Dame un ejemplo relacionado con tu experiencia"
- "¿Qué opinión personal tienes?"

Texto: {excerpt}

JSON:"#
    )
}

/// Strip markdown fences and cut to the outermost JSON object
pub fn clean_model_response(content: &str) -> Result<String, AiFailure> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AiFailure::EmptyResponse);
    }

    let unfenced = trimmed
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if unfenced.starts_with('{') && unfenced.ends_with('}') {
        return Ok(unfenced.to_string());
    }
    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(unfenced[start..=end].to_string()),
        _ => Err(AiFailure::InvalidJson("No JSON in response".to_string())),
    }
}

/// Validate a cleaned model answer into a verdict
pub fn parse_ai_verdict(cleaned: &str, doc: &ExtractedDocument) -> Result<AnalysisVerdict, AiFailure> {
    let raw: RawAiVerdict =
        serde_json::from_str(cleaned).map_err(|e| AiFailure::InvalidJson(e.to_string()))?;

    let value = raw
        .porcentaje
        .ok_or_else(|| AiFailure::InvalidVerdict("missing porcentaje".to_string()))?;
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AiFailure::InvalidVerdict(format!("porcentaje out of range: {}", value)));
    }
    let percentage = value.round() as u8;

    let indicators = non_blank(raw.indicadores);
    let questions = pad_questions(non_blank(raw.preguntas));

    AnalysisVerdict::new(
        percentage,
        indicators,
        questions,
        VocabularyMetrics::from_document(doc),
        true,
        STATUS_AI_SUCCESS,
    )
    .map_err(|e| AiFailure::InvalidVerdict(e.to_string()))
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Clone)]
pub struct AiAnalyzer {
    client: ProviderClient,
    config: AiConfig,
}

impl AiAnalyzer {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            client: ProviderClient::new(&config.base_url, config.timeout()),
            config: config.clone(),
        }
    }

    /// Whether a call would be attempted at all
    pub fn is_configured(&self) -> bool {
        self.config.enabled && self.config.usable_api_key().is_some()
    }

    pub async fn analyze(
        &self,
        doc: &ExtractedDocument,
        level: EducationalLevel,
    ) -> Result<AnalysisVerdict, AiFailure> {
        if !self.config.enabled {
            return Err(AiFailure::Disabled);
        }
        let api_key = self.config.usable_api_key().ok_or(AiFailure::MissingApiKey)?;

        let prompt = build_prompt(&doc.text, level, self.config.max_prompt_chars);
        info!(
            model = %self.config.model,
            level = %level,
            chars = doc.char_count,
            "[AI_ANALYZER] requesting verdict"
        );

        let result = self
            .client
            .call_gemini(&self.config.model, api_key, &prompt, self.config.max_output_tokens)
            .await?;
        debug!(latency_ms = result.latency_ms, bytes = result.content.len(), "[AI_ANALYZER] response received");

        let cleaned = clean_model_response(&result.content)?;
        let verdict = parse_ai_verdict(&cleaned, doc)?;
        info!(
            percentage = verdict.percentage(),
            latency_ms = result.latency_ms,
            "[AI_ANALYZER] verdict accepted"
        );
        Ok(verdict)
    }
}
