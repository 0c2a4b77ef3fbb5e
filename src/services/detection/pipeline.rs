// Detection Pipeline
// One AI attempt under a deadline, heuristic verdict on any failure

use std::time::Duration;
use tracing::{info, warn};

use crate::models::{AnalysisVerdict, EducationalLevel, ExtractedDocument};
use crate::services::config_store::AiConfig;

use super::heuristic::{analyze_heuristic_with_reason, HeuristicError};
use super::llm_analyzer::{AiAnalyzer, AiFailure};

#[derive(Clone)]
pub struct DetectionService {
    ai: AiAnalyzer,
    timeout: Duration,
}

impl DetectionService {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            ai: AiAnalyzer::new(config),
            timeout: config.timeout(),
        }
    }

    pub fn ai_configured(&self) -> bool {
        self.ai.is_configured()
    }

    /// Analyze a document. AI failures are recovered here and only show up
    /// in the verdict's `status_info`; an empty document is an error.
    pub async fn analyze(
        &self,
        doc: &ExtractedDocument,
        level: EducationalLevel,
    ) -> Result<AnalysisVerdict, HeuristicError> {
        if doc.is_empty() {
            return Err(HeuristicError::InsufficientText);
        }

        let attempt = match tokio::time::timeout(self.timeout, self.ai.analyze(doc, level)).await {
            Ok(result) => result,
            Err(_) => Err(AiFailure::Timeout(self.timeout.as_secs())),
        };

        match attempt {
            Ok(verdict) => {
                info!(percentage = verdict.percentage(), level = %level, "[PIPELINE] AI verdict");
                Ok(verdict)
            }
            Err(failure) => {
                let reason = failure.diagnosis();
                match failure {
                    AiFailure::MissingApiKey | AiFailure::Disabled => {
                        info!(reason = %reason, "[PIPELINE] AI skipped, using heuristic")
                    }
                    other => warn!(error = %other, reason = %reason, "[PIPELINE] AI failed, using heuristic"),
                }
                analyze_heuristic_with_reason(doc, level, Some(reason.as_str()))
            }
        }
    }
}
