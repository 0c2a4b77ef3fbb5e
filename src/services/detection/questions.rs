// Validation Questions
// Fixed pool of follow-up questions a reviewer can ask the student

use super::heuristic::Signal;

pub const MAX_QUESTIONS: usize = 3;

const GENERIC_QUESTIONS: [&str; 3] = [
    "¿Puedes explicar el tema principal con tus propias palabras?",
    "Dame un ejemplo relacionado con tu experiencia.",
    "¿Qué opinión personal tienes sobre el tema?",
];

fn question_for(signal: Signal) -> Option<&'static str> {
    match signal {
        Signal::UniformStructure => Some("¿Puedes explicar con tus propias palabras?"),
        Signal::AdvancedVocabulary => {
            Some("¿Qué significan algunas de las palabras más difíciles que usaste?")
        }
        Signal::LowPunctuationVariety => Some("¿Cómo organizaste las ideas antes de escribir?"),
        Signal::Repetition => Some("¿Por qué repites esa idea? ¿Puedes decirla de otra forma?"),
        Signal::ShortText => Some("¿Qué más podrías contar sobre este tema?"),
        Signal::WeakVocabularySignal => None,
    }
}

/// Questions keyed by the fired signals, in detection order, padded with
/// generic questions up to `MAX_QUESTIONS`.
pub fn questions_for(signals: &[Signal]) -> Vec<String> {
    let keyed = signals.iter().filter_map(|s| question_for(*s)).map(str::to_string);
    pad_questions(keyed.collect())
}

/// Deduplicate, truncate to `MAX_QUESTIONS` and fill from the generic pool.
pub fn pad_questions(questions: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(MAX_QUESTIONS);
    let candidates = questions
        .into_iter()
        .chain(GENERIC_QUESTIONS.iter().map(|q| q.to_string()));
    for question in candidates {
        if out.len() == MAX_QUESTIONS {
            break;
        }
        if !out.contains(&question) {
            out.push(question);
        }
    }
    out
}
