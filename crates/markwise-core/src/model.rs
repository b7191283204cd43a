//! Core data model types for markwise.
//!
//! Questions and submissions are the inputs to an evaluation; dimensions
//! and difficulty labels are the vocabulary the scorer and weight selector
//! share.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four axes an answer is assessed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Intent,
    Vocabulary,
    Spelling,
    Grammar,
}

impl Dimension {
    /// All dimensions, in the order they are reported.
    pub const ALL: [Dimension; 4] = [
        Dimension::Intent,
        Dimension::Vocabulary,
        Dimension::Spelling,
        Dimension::Grammar,
    ];

    /// Key used for this dimension in judgments and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Intent => "intent",
            Dimension::Vocabulary => "vocabulary",
            Dimension::Spelling => "spelling",
            Dimension::Grammar => "grammar",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty labels that change the weighting.
///
/// Question files carry difficulty as free text; anything that does not
/// parse here is weighted like `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Case-insensitive lookup that never fails; unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Difficulty> {
        label.parse().ok()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A question with its reference answer and grading metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Identifier echoed into the evaluation result.
    #[serde(default, deserialize_with = "string_or_number")]
    pub question_id: String,
    /// The question as shown to the student.
    #[serde(default)]
    pub question_text: String,
    /// The reference answer.
    #[serde(default)]
    pub correct_answer: ReferenceAnswer,
    /// Topic or activity the question belongs to (e.g. "reading comprehension").
    #[serde(default)]
    pub context: String,
    /// Difficulty label, matched case-insensitively.
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    /// Maximum achievable score.
    #[serde(default = "default_max_score")]
    pub max_score: f64,
}

/// The reference answer of a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceAnswer {
    #[serde(default)]
    pub option_text: String,
}

impl Question {
    /// Build a question with default difficulty and a max score of 1.
    pub fn new(id: &str, question_text: &str, reference_answer: &str) -> Self {
        Self {
            question_id: id.to_string(),
            question_text: question_text.to_string(),
            correct_answer: ReferenceAnswer {
                option_text: reference_answer.to_string(),
            },
            context: String::new(),
            difficulty: default_difficulty(),
            max_score: default_max_score(),
        }
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = context.to_string();
        self
    }

    pub fn with_difficulty(mut self, difficulty: &str) -> Self {
        self.difficulty = difficulty.to_string();
        self
    }

    pub fn with_max_score(mut self, max_score: f64) -> Self {
        self.max_score = max_score;
        self
    }

    /// The reference answer text.
    pub fn reference_answer(&self) -> &str {
        &self.correct_answer.option_text
    }

    /// Max score used for scaling. Non-positive or non-finite values are
    /// treated as 1 so scaling never divides by zero.
    pub fn effective_max_score(&self) -> f64 {
        if self.max_score.is_finite() && self.max_score > 0.0 {
            self.max_score
        } else {
            1.0
        }
    }
}

fn default_difficulty() -> String {
    "Medium".to_string()
}

fn default_max_score() -> f64 {
    1.0
}

/// The questions a batch of submissions is graded against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Look up a question by id. The first match wins if ids repeat.
    pub fn get(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.question_id == question_id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// A student's answer to one question, as read from a submissions file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Optional caller-side identifier; defaults to the position in the file.
    #[serde(default)]
    pub submission_id: Option<String>,
    /// Question this answer responds to.
    #[serde(deserialize_with = "string_or_number")]
    pub question_id: String,
    /// The free-text answer.
    pub answer: String,
}

/// Accept identifiers written either as strings or as integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
    })
}
