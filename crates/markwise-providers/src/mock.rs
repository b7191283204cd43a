//! Mock assessor for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use markwise_core::traits::{AssessRequest, AssessResponse, Assessor, TokenUsage};

use crate::error::ProviderError;

/// Judgment text that scores every dimension at 80.
pub const DEFAULT_MOCK_JUDGMENT: &str = r#"{
  "intent": {"score": 80, "understood": true, "concepts_right": [], "concepts_missed": [], "note": "Mock"},
  "vocabulary": {"score": 80, "improve": [], "note": "Mock"},
  "spelling": {"score": 80, "errors": [], "phonetic_tries": [], "note": "Mock"},
  "grammar": {"score": 80, "errors": [], "strengths": [], "note": "Mock"}
}"#;

/// An assessor that returns scripted judgment text without network calls.
///
/// Responses are picked by matching keys as substrings of the student answer.
pub struct MockAssessor {
    /// Map of answer substring → judgment text.
    responses: HashMap<String, String>,
    /// Response if no key matches.
    default_response: String,
    /// When set, every call fails with the produced error.
    failure: Option<fn() -> ProviderError>,
    call_count: AtomicU32,
    last_request: Mutex<Option<AssessRequest>>,
}

impl MockAssessor {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: DEFAULT_MOCK_JUDGMENT.to_string(),
            failure: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            default_response: response.to_string(),
            ..Self::new(HashMap::new())
        }
    }

    /// Create a mock whose every call fails.
    pub fn failing(error: fn() -> ProviderError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(HashMap::new())
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<AssessRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Assessor for MockAssessor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn judge(&self, request: &AssessRequest) -> Result<AssessResponse, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        if let Some(failure) = self.failure {
            return Err(failure());
        }

        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.student_answer.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        // Rough estimate
        let prompt_tokens = (request.question_text.len() + request.student_answer.len()) as u32 / 4;
        let completion_tokens = (content.len() / 4) as u32;

        Ok(AssessResponse {
            content,
            model: "mock-model".to_string(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }
}
