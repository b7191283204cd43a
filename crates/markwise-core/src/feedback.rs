//! Template-based remarks and suggestions.
//!
//! Both generators are deterministic functions of the judgment (and, for
//! remarks, the percentage).

use crate::judgment::Judgment;

/// At most this many suggestion fragments are kept.
pub const MAX_SUGGESTIONS: usize = 3;

/// Returned when no suggestion applies.
pub const NO_SUGGESTIONS: &str = "Keep up the good work!";

const UNDERSTOOD_REMARK: &str = "You understood the main idea.";
const PHONETIC_REMARK: &str = "Good phonetic spelling attempts!";
const DEFAULT_GRAMMAR_FIX: &str = "Check structure";

/// Inclusive lower bounds and the tone sentence for each band.
const TONE_BANDS: [(f64, &str); 4] = [
    (90.0, "Excellent work!"),
    (75.0, "Great job!"),
    (60.0, "Good effort!"),
    (40.0, "Nice try!"),
];
const LOWEST_TONE: &str = "Keep practicing!";

/// Tone sentence for a percentage.
pub fn tone_for(percentage: f64) -> &'static str {
    TONE_BANDS
        .iter()
        .find(|(floor, _)| percentage >= *floor)
        .map(|(_, tone)| *tone)
        .unwrap_or(LOWEST_TONE)
}

/// Encouraging remarks: tone, then understanding, then phonetic spelling.
pub fn generate_remarks(percentage: f64, judgment: &Judgment) -> String {
    let mut remarks = vec![tone_for(percentage)];

    if judgment.intent.understood {
        remarks.push(UNDERSTOOD_REMARK);
    }
    if !judgment.spelling.phonetic_attempts.is_empty() {
        remarks.push(PHONETIC_REMARK);
    }

    remarks.join(" ")
}

/// Up to [`MAX_SUGGESTIONS`] fragments joined with `" | "`, in priority
/// order: missed concepts, vocabulary, spelling, grammar.
pub fn generate_suggestions(judgment: &Judgment) -> String {
    let mut suggestions = Vec::new();

    let missed = &judgment.intent.concepts_missed;
    if !missed.is_empty() {
        let first_two: Vec<&str> = missed.iter().take(2).map(String::as_str).collect();
        suggestions.push(format!("Include: {}", first_two.join(", ")));
    }

    if let Some(tip) = judgment.vocabulary.improvements.first() {
        suggestions.push(format!("Word tip: {tip}"));
    }

    if let Some(err) = judgment.spelling.errors.first() {
        suggestions.push(format!("Spelling: '{}' → '{}'", err.word, err.correct));
    }

    if let Some(err) = judgment.grammar.errors.first() {
        let fix = err.fix.as_deref().unwrap_or(DEFAULT_GRAMMAR_FIX);
        suggestions.push(format!("Grammar: {fix}"));
    }

    if suggestions.is_empty() {
        return NO_SUGGESTIONS.to_string();
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions.join(" | ")
}
