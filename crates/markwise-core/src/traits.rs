//! The assessor capability.
//!
//! An assessor turns a question, its reference answer and a student answer
//! into raw judgment text. `markwise-providers` implements it over HTTP
//! APIs; tests implement it with canned text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::model::Question;

/// Backend that produces a raw per-dimension judgment.
///
/// Model and sampling settings are fixed when the assessor is built.
#[async_trait]
pub trait Assessor: Send + Sync {
    /// Human-readable backend name (e.g. "openai").
    fn name(&self) -> &str;

    /// Request one judgment. Transport and API failures are returned as-is.
    async fn judge(&self, request: &AssessRequest) -> Result<AssessResponse, ProviderError>;
}

/// Everything an assessor needs to judge one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessRequest {
    pub question_text: String,
    pub reference_answer: String,
    pub student_answer: String,
    pub difficulty: String,
    pub context: String,
}

impl AssessRequest {
    pub fn for_question(question: &Question, student_answer: &str) -> Self {
        Self {
            question_text: question.question_text.clone(),
            reference_answer: question.reference_answer().to_string(),
            student_answer: student_answer.to_string(),
            difficulty: question.difficulty.clone(),
            context: question.context.clone(),
        }
    }
}

/// Raw assessor output plus call metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessResponse {
    /// Judgment text, possibly fenced; parsed by the scorer.
    pub content: String,
    /// Model that actually answered.
    pub model: String,
    pub token_usage: TokenUsage,
    pub latency_ms: u64,
}

/// Token accounting for one assessor call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_from_question() {
        let question = Question::new("Q1", "What do plants need?", "Sunlight and water")
            .with_context("Science")
            .with_difficulty("Easy");
        let request = AssessRequest::for_question(&question, "sun and watter");
        assert_eq!(request.reference_answer, "Sunlight and water");
        assert_eq!(request.student_answer, "sun and watter");
        assert_eq!(request.difficulty, "Easy");
        assert_eq!(request.context, "Science");
    }
}
