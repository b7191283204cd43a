//! Judgments returned by an assessor, and the pipeline that reads them.
//!
//! Reading happens in three stages:
//!
//! 1. [`strip_code_fence`] removes a surrounding markdown fence and its
//!    optional language tag.
//! 2. [`parse_raw_judgment`] parses the text as a JSON object and checks that
//!    every dimension present is an object.
//! 3. [`RawJudgment::into_judgment`] fills every field, defaulting anything
//!    missing or mistyped and clamping scores into `0..=100`.
//!
//! [`read_judgment`] chains the stages and substitutes
//! [`fallback_judgment`] when stage 2 fails.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::JudgmentError;
use crate::model::Dimension;

/// Note attached to every dimension of the fallback judgment.
pub const FALLBACK_NOTE: &str = "Parse error";

/// Score given to every dimension of the fallback judgment.
pub const FALLBACK_SCORE: f64 = 50.0;

/// Per-dimension assessment of one answer.
///
/// Serializes back to the same shape the assessor is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Judgment {
    pub intent: IntentJudgment,
    pub vocabulary: VocabularyJudgment,
    pub spelling: SpellingJudgment,
    pub grammar: GrammarJudgment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntentJudgment {
    pub score: f64,
    pub understood: bool,
    #[serde(rename = "concepts_right")]
    pub concepts_matched: Vec<String>,
    pub concepts_missed: Vec<String>,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VocabularyJudgment {
    pub score: f64,
    pub good_words: Vec<String>,
    #[serde(rename = "improve")]
    pub improvements: Vec<String>,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpellingJudgment {
    pub score: f64,
    pub errors: Vec<SpellingError>,
    #[serde(rename = "phonetic_tries")]
    pub phonetic_attempts: Vec<String>,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrammarJudgment {
    pub score: f64,
    pub errors: Vec<GrammarError>,
    pub strengths: Vec<String>,
    pub note: String,
}

/// A misspelled word and its correction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellingError {
    /// The word as the student wrote it.
    pub word: String,
    /// The correct spelling.
    pub correct: String,
    /// Error tag such as "phonetic" or "typo".
    #[serde(rename = "type")]
    pub kind: String,
}

/// A grammar problem and, when the assessor gave one, its fix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarError {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl Judgment {
    /// Raw score of one dimension.
    pub fn score(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Intent => self.intent.score,
            Dimension::Vocabulary => self.vocabulary.score,
            Dimension::Spelling => self.spelling.score,
            Dimension::Grammar => self.grammar.score,
        }
    }
}

/// The neutral judgment used when an assessor response cannot be read.
///
/// Built once; every call returns the same value.
pub fn fallback_judgment() -> &'static Judgment {
    static FALLBACK: OnceLock<Judgment> = OnceLock::new();
    FALLBACK.get_or_init(|| Judgment {
        intent: IntentJudgment {
            score: FALLBACK_SCORE,
            understood: true,
            note: FALLBACK_NOTE.to_string(),
            ..Default::default()
        },
        vocabulary: VocabularyJudgment {
            score: FALLBACK_SCORE,
            note: FALLBACK_NOTE.to_string(),
            ..Default::default()
        },
        spelling: SpellingJudgment {
            score: FALLBACK_SCORE,
            note: FALLBACK_NOTE.to_string(),
            ..Default::default()
        },
        grammar: GrammarJudgment {
            score: FALLBACK_SCORE,
            note: FALLBACK_NOTE.to_string(),
            ..Default::default()
        },
    })
}

/// Where a judgment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgmentSource {
    /// Read from the assessor response.
    Parsed,
    /// The response was unusable; the fallback judgment was substituted.
    Fallback,
}

/// Result of reading an assessor response.
#[derive(Debug, Clone)]
pub struct ReadJudgment {
    pub judgment: Judgment,
    pub source: JudgmentSource,
    /// Why the fallback was used, if it was.
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Stage 1: fence stripping
// ---------------------------------------------------------------------------

/// Remove a surrounding markdown code fence and its language tag.
///
/// Text without a leading fence is returned trimmed. An unclosed fence is
/// stripped from the front only.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let body = &rest[tag_len..];

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

// ---------------------------------------------------------------------------
// Stage 2: structural parse
// ---------------------------------------------------------------------------

/// A judgment whose four dimensions are known to be JSON objects. An absent
/// dimension is held as an empty object and defaulted in stage 3.
#[derive(Debug, Clone)]
pub struct RawJudgment {
    intent: Map<String, Value>,
    vocabulary: Map<String, Value>,
    spelling: Map<String, Value>,
    grammar: Map<String, Value>,
}

/// Parse fence-free text into a [`RawJudgment`].
pub fn parse_raw_judgment(text: &str) -> Result<RawJudgment, JudgmentError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(mut root) = value else {
        return Err(JudgmentError::NotAnObject);
    };

    let mut take = |dimension: Dimension| match root.remove(dimension.as_str()) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(JudgmentError::MalformedDimension(dimension)),
        None => Ok(Map::new()),
    };

    Ok(RawJudgment {
        intent: take(Dimension::Intent)?,
        vocabulary: take(Dimension::Vocabulary)?,
        spelling: take(Dimension::Spelling)?,
        grammar: take(Dimension::Grammar)?,
    })
}

// ---------------------------------------------------------------------------
// Stage 3: field defaults
// ---------------------------------------------------------------------------

impl RawJudgment {
    /// Fill every field of the judgment. Never fails.
    pub fn into_judgment(self) -> Judgment {
        Judgment {
            intent: IntentJudgment {
                score: score_field(&self.intent),
                understood: flag_field(&self.intent, "understood"),
                concepts_matched: string_list(&self.intent, "concepts_right"),
                concepts_missed: string_list(&self.intent, "concepts_missed"),
                note: text_field(&self.intent, "note"),
            },
            vocabulary: VocabularyJudgment {
                score: score_field(&self.vocabulary),
                good_words: string_list(&self.vocabulary, "good_words"),
                improvements: string_list(&self.vocabulary, "improve"),
                note: text_field(&self.vocabulary, "note"),
            },
            spelling: SpellingJudgment {
                score: score_field(&self.spelling),
                errors: object_list(&self.spelling, "errors")
                    .map(|e| SpellingError {
                        word: text_field(e, "word"),
                        correct: text_field(e, "correct"),
                        kind: text_field(e, "type"),
                    })
                    .collect(),
                phonetic_attempts: string_list(&self.spelling, "phonetic_tries"),
                note: text_field(&self.spelling, "note"),
            },
            grammar: GrammarJudgment {
                score: score_field(&self.grammar),
                errors: object_list(&self.grammar, "errors")
                    .map(|e| GrammarError {
                        kind: text_field(e, "type"),
                        fix: e.get("fix").and_then(Value::as_str).map(str::to_string),
                    })
                    .collect(),
                strengths: string_list(&self.grammar, "strengths"),
                note: text_field(&self.grammar, "note"),
            },
        }
    }
}

/// Score clamped into `0..=100`; missing or non-numeric scores are 0.
fn score_field(map: &Map<String, Value>) -> f64 {
    let score = match map.get("score") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    score
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, 100.0))
        .unwrap_or(0.0)
}

fn flag_field(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn text_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn object_list<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    map.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Read an assessor response, substituting the fallback judgment if its
/// structure is unusable.
pub fn read_judgment(raw: &str) -> ReadJudgment {
    match parse_raw_judgment(strip_code_fence(raw)) {
        Ok(parsed) => ReadJudgment {
            judgment: parsed.into_judgment(),
            source: JudgmentSource::Parsed,
            error: None,
        },
        Err(e) => ReadJudgment {
            judgment: fallback_judgment().clone(),
            source: JudgmentSource::Fallback,
            error: Some(e.to_string()),
        },
    }
}
