// Detection Module
// AI-authorship detection organized into specialized submodules:
// - heuristic: deterministic stylometric scoring (fallback path)
// - llm_analyzer: Gemini verdicts with response validation
// - pipeline: AI attempt under a deadline, heuristic on failure
// - questions: follow-up questions for the reviewer
// - sensitivity: per-level expectations

pub mod heuristic;
pub mod llm_analyzer;
pub mod pipeline;
pub mod questions;
pub mod sensitivity;

pub use heuristic::{
    analyze_heuristic,
    analyze_heuristic_with_reason,
    score_features,
    HeuristicError,
    HeuristicScore,
    Signal,
};
pub use llm_analyzer::{build_prompt, clean_model_response, parse_ai_verdict, AiAnalyzer, AiFailure};
pub use pipeline::DetectionService;
pub use questions::{pad_questions, questions_for, MAX_QUESTIONS};
pub use sensitivity::{level_indicator, level_profile, LevelProfile};
