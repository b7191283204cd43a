//! Question bank and submission loading.
//!
//! Question banks are JSON (an array of questions, or an object with a
//! `questions` array) or TOML (`[[questions]]` tables). Submissions are a
//! JSON array.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Difficulty, Question, QuestionBank, Submission};

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonBank {
    List(Vec<Question>),
    Wrapped(QuestionBank),
}

/// Load a question bank, choosing the format by file extension.
pub fn load_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "toml") {
        parse_question_bank_toml(&content, path)
    } else {
        parse_question_bank_json(&content, path)
    }
}

/// Parse a JSON question bank (useful for testing).
pub fn parse_question_bank_json(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: JsonBank = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;
    Ok(match parsed {
        JsonBank::List(questions) => QuestionBank::new(questions),
        JsonBank::Wrapped(bank) => bank,
    })
}

/// Parse a TOML question bank (useful for testing).
pub fn parse_question_bank_toml(content: &str, source_path: &Path) -> Result<QuestionBank> {
    toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))
}

/// Load submissions from a JSON array.
pub fn load_submissions(path: &Path) -> Result<Vec<Submission>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submissions: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse submissions: {}", path.display()))
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for issues that would make grading odd.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();

    for question in &bank.questions {
        let id = question.question_id.clone();
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_id: Some(id.clone()),
                message,
            })
        };

        if question.question_id.trim().is_empty() {
            warn("question_id is empty".into());
        } else if !seen_ids.insert(question.question_id.as_str()) {
            warn(format!("duplicate question ID: {}", question.question_id));
        }

        if question.question_text.trim().is_empty() {
            warn("question_text is empty".into());
        }

        if question.reference_answer().trim().is_empty() {
            warn("correct_answer.option_text is empty".into());
        }

        if Difficulty::from_label(&question.difficulty).is_none() {
            warn(format!(
                "unknown difficulty '{}', weighted as Medium",
                question.difficulty
            ));
        }

        if question.effective_max_score() != question.max_score {
            warn(format!(
                "max_score {} is not positive, treated as 1",
                question.max_score
            ));
        }
    }

    warnings
}
