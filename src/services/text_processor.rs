// Text Processing Service
// Normalization, tokenization and stylometric features for Spanish prose

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::models::ExtractedDocument;

/// Look-back window (in content words) used by the repetition feature.
pub const REPETITION_WINDOW: usize = 50;
/// Window (in words) for the moving-average vocabulary density.
pub const DENSITY_WINDOW: usize = 25;
/// Punctuation occurrences beyond this count no longer dilute the variety ratio.
pub const PUNCTUATION_SATURATION: usize = 6;

const SENTENCE_DELIMITERS: [char; 3] = ['.', '!', '?'];
const EXTRA_PUNCTUATION: [char; 12] = ['¿', '¡', '«', '»', '…', '—', '–', '“', '”', '‘', '’', '·'];

/// Spanish function words ignored by the repetition feature.
const STOPWORDS: &[&str] = &[
    "a", "al", "algo", "como", "con", "de", "del", "donde", "e", "el", "ella", "en", "entre",
    "era", "es", "esa", "ese", "eso", "esta", "está", "este", "esto", "fue", "ha", "han", "hay",
    "la", "las", "le", "les", "lo", "los", "me", "mi", "muy", "más", "ni", "no", "nos", "o",
    "para", "pero", "por", "que", "se", "ser", "si", "sin", "sobre", "son", "su", "sus", "también",
    "te", "tu", "u", "un", "una", "unas", "uno", "unos", "y", "ya", "yo",
];

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)+|[\p{L}\p{N}]+").expect("word regex"))
}

fn space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\u{3000}\u{00A0}\u{200B}\u{FEFF}]").expect("space regex"))
}

fn horizontal_ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\x0C\x0B]+").expect("whitespace regex"))
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("blank lines regex"))
}

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

/// Normalize whitespace and typographic quotes in extracted text
pub fn normalize_punctuation(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut s = text
        .replace('\u{201c}', "\"")
        .replace('\u{201d}', "\"")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'");

    s = space_re().replace_all(&s, " ").to_string();

    // Normalize line endings
    s = s.replace("\r\n", "\n").replace('\r', "\n");

    s = horizontal_ws_re().replace_all(&s, " ").to_string();

    s = s.lines().map(|ln| ln.trim()).collect::<Vec<_>>().join("\n");
    s = blank_lines_re().replace_all(&s, "\n\n").to_string();

    s.trim().to_string()
}

/// Lower-cased word tokens (letters and digits, accents included). Decimal
/// numbers such as `3.5` or `1,25` are one token.
pub fn split_words(text: &str) -> Vec<String> {
    word_re()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Split on `.`, `!` and `?`. Decimal points do not end a sentence and pieces
/// without any word are dropped. Text without delimiters is one sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut buffer = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        buffer.push(ch);
        if !SENTENCE_DELIMITERS.contains(&ch) {
            continue;
        }
        if ch == '.' && i > 0 && i + 1 < chars.len() {
            if chars[i - 1].is_ascii_digit() && chars[i + 1].is_ascii_digit() {
                continue;
            }
        }
        // Runs like "?!" or "..." close a single sentence.
        if chars.get(i + 1).is_some_and(|next| SENTENCE_DELIMITERS.contains(next)) {
            continue;
        }
        push_sentence(&mut sentences, &buffer);
        buffer.clear();
    }
    push_sentence(&mut sentences, &buffer);

    if sentences.is_empty() && word_re().is_match(text) {
        sentences.push(text.trim().to_string());
    }
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim();
    if word_re().is_match(trimmed) {
        sentences.push(trimmed.to_string());
    }
}

pub fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation() || EXTRA_PUNCTUATION.contains(&ch)
}

pub fn is_stopword(word: &str) -> bool {
    stopwords().contains(word)
}

fn is_decimal_separator(chars: &[char], i: usize) -> bool {
    matches!(chars[i], '.' | ',')
        && i > 0
        && chars[i - 1].is_ascii_digit()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
}

/// Punctuation marks in reading order, decimal separators excluded
pub fn punctuation_marks(text: &str) -> Vec<char> {
    let chars: Vec<char> = text.chars().collect();
    (0..chars.len())
        .filter(|&i| is_punctuation(chars[i]) && !is_decimal_separator(&chars, i))
        .map(|i| chars[i])
        .collect()
}

/// Mean unique-word percentage over every `window`-word span (MATTR).
/// Shorter texts fall back to the plain unique/total ratio.
pub fn windowed_density(words: &[String], window: usize) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    if window == 0 || words.len() <= window {
        let unique = words.iter().map(String::as_str).collect::<HashSet<_>>().len();
        return unique as f64 / words.len() as f64 * 100.0;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in &words[..window] {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }
    let mut total = counts.len();
    for i in window..words.len() {
        let outgoing = words[i - window].as_str();
        if let Some(n) = counts.get_mut(outgoing) {
            *n -= 1;
            if *n == 0 {
                counts.remove(outgoing);
            }
        }
        *counts.entry(words[i].as_str()).or_insert(0) += 1;
        total += counts.len();
    }
    let spans = words.len() - window + 1;
    total as f64 / spans as f64 / window as f64 * 100.0
}

/// Fraction of content words that already appeared within the previous
/// `window` content words.
pub fn repetition_rate(words: &[String], window: usize) -> f64 {
    let content: Vec<&str> = words
        .iter()
        .map(String::as_str)
        .filter(|w| !is_stopword(w))
        .collect();
    if content.is_empty() {
        return 0.0;
    }

    let mut last_seen: HashMap<&str, usize> = HashMap::new();
    let mut repeats = 0usize;
    for (idx, word) in content.iter().enumerate() {
        if let Some(&prev) = last_seen.get(word) {
            if idx - prev <= window {
                repeats += 1;
            }
        }
        last_seen.insert(word, idx);
    }
    repeats as f64 / content.len() as f64
}

/// Stylometric features consumed by the heuristic analyzer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextFeatures {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    /// Coefficient of variation of words per sentence; `None` below three sentences.
    pub sentence_length_cv: Option<f64>,
    /// Unique words over total words, as a percentage.
    pub vocabulary_density: f64,
    /// Length-independent density (see `windowed_density`), compared against level ceilings.
    pub windowed_density: f64,
    pub punctuation_total: usize,
    pub punctuation_distinct: usize,
    /// Distinct marks over occurrences (occurrences saturated at
    /// `PUNCTUATION_SATURATION`), in (0, 1]; `None` without punctuation.
    pub punctuation_variety: Option<f64>,
    pub repetition_rate: f64,
}

/// Minimum sentences for the sentence-length variance feature.
pub const MIN_SENTENCES_FOR_VARIANCE: usize = 3;

pub fn compute_stylometry(doc: &ExtractedDocument) -> TextFeatures {
    if doc.is_empty() {
        return TextFeatures::default();
    }

    let sentence_lengths: Vec<f64> = doc
        .sentences
        .iter()
        .map(|s| split_words(s).len() as f64)
        .filter(|&n| n > 0.0)
        .collect();
    let sentence_count = sentence_lengths.len().max(1);
    let avg_sentence_length = doc.word_count as f64 / sentence_count as f64;

    let sentence_length_cv = if sentence_lengths.len() >= MIN_SENTENCES_FOR_VARIANCE {
        let mean = sentence_lengths.iter().sum::<f64>() / sentence_lengths.len() as f64;
        Some(std_dev(&sentence_lengths) / mean.max(1e-9))
    } else {
        None
    };

    let vocabulary_density = doc.unique_word_count() as f64 / doc.word_count as f64 * 100.0;

    let marks = punctuation_marks(&doc.text);
    let punctuation_total = marks.len();
    let punctuation_distinct = marks.iter().collect::<HashSet<_>>().len();
    let punctuation_variety = if punctuation_total == 0 {
        None
    } else {
        let ratio = punctuation_distinct as f64 / punctuation_total.min(PUNCTUATION_SATURATION) as f64;
        Some(ratio.min(1.0))
    };

    TextFeatures {
        word_count: doc.word_count,
        sentence_count,
        avg_sentence_length,
        sentence_length_cv,
        vocabulary_density,
        windowed_density: windowed_density(&doc.words, DENSITY_WINDOW),
        punctuation_total,
        punctuation_distinct,
        punctuation_variety,
        repetition_rate: repetition_rate(&doc.words, REPETITION_WINDOW),
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
