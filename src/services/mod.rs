// Detector IA Core Services

pub mod text_processor;
pub mod config_store;
pub mod providers;
pub mod extractor;
pub mod formatter;
pub mod detection;

pub use text_processor::*;
pub use config_store::*;
pub use providers::*;
pub use extractor::{extract_text, is_allowed_file, DocumentKind, ExtractionError, ALLOWED_EXTENSIONS};
pub use formatter::format_response;

// Re-export detection module functions
pub use detection::{
    analyze_heuristic,
    analyze_heuristic_with_reason,
    score_features,
    AiAnalyzer,
    AiFailure,
    DetectionService,
    HeuristicError,
    Signal,
};
