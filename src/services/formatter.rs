// Result Formatter
// Verdict to wire shape

use crate::models::{AnalysisResponse, AnalysisVerdict, EducationalLevel};

pub fn format_response(
    verdict: &AnalysisVerdict,
    filename: &str,
    level: EducationalLevel,
) -> AnalysisResponse {
    let risk = verdict.risk();
    let metrics = verdict.vocabulary_metrics();
    AnalysisResponse {
        porcentaje: verdict.percentage(),
        color: risk.color().to_string(),
        label: risk.label().to_string(),
        indicadores: verdict.indicators().to_vec(),
        preguntas: verdict.validation_questions().to_vec(),
        filename: filename.to_string(),
        analizado_con_ia: verdict.analyzed_with_ai(),
        nivel_educativo: level.code().to_string(),
        error_info: verdict.status_info().to_string(),
        longitud_texto: metrics.text_length,
        palabras_unicas: metrics.unique_word_count,
        densidad_vocabulario: metrics.vocabulary_density,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VocabularyMetrics;

    fn verdict(percentage: u8) -> AnalysisVerdict {
        AnalysisVerdict::new(
            percentage,
            vec!["Repetición de estructuras".to_string()],
            vec!["¿Puedes explicar con tus propias palabras?".to_string()],
            VocabularyMetrics {
                text_length: 120,
                unique_word_count: 14,
                vocabulary_density: 63.6,
            },
            false,
            "Análisis automático (heurístico)",
        )
        .unwrap()
    }

    #[test]
    fn test_format_fields() {
        let response = format_response(&verdict(75), "ensayo.txt", EducationalLevel::Medio3To4);
        assert_eq!(response.porcentaje, 75);
        assert_eq!(response.color, "red");
        assert_eq!(response.label, "Alto");
        assert_eq!(response.nivel_educativo, "medio-3-4");
        assert_eq!(response.filename, "ensayo.txt");
        assert_eq!(response.error_info, "Análisis automático (heurístico)");
        assert_eq!(response.palabras_unicas, 14);
    }

    #[test]
    fn test_label_follows_percentage() {
        let low = format_response(&verdict(39), "a.txt", EducationalLevel::Superior);
        let mid = format_response(&verdict(40), "a.txt", EducationalLevel::Superior);
        assert_eq!((low.color.as_str(), low.label.as_str()), ("green", "Bajo"));
        assert_eq!((mid.color.as_str(), mid.label.as_str()), ("yellow", "Medio"));
    }

    #[test]
    fn test_wire_names() {
        let response = format_response(&verdict(50), "a.txt", EducationalLevel::Superior);
        let json = serde_json::to_value(&response).unwrap();
        for key in [
            "porcentaje", "color", "label", "indicadores", "preguntas", "filename",
            "analizado_con_ia", "nivel_educativo", "error_info", "longitud_texto",
            "palabras_unicas", "densidad_vocabulario",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        let back: AnalysisResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }
}
