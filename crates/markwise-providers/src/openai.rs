//! OpenAI chat-completions assessor.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use markwise_core::prompt::{build_prompt, ASSESSOR_SYSTEM_PROMPT};
use markwise_core::traits::{AssessRequest, AssessResponse, Assessor, TokenUsage};

use crate::config::AssessorSettings;
use crate::error::{check_status, http_client, transport_error, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Temperature sent for models that only accept their default.
pub const FIXED_TEMPERATURE: f64 = 1.0;

/// Whether a model rejects custom sampling temperatures.
pub fn has_fixed_temperature(model: &str) -> bool {
    model.contains("gpt-5")
}

/// Temperature actually sent for `model`.
pub fn effective_temperature(model: &str, requested: f64) -> f64 {
    if has_fixed_temperature(model) {
        FIXED_TEMPERATURE
    } else {
        requested
    }
}

/// OpenAI-compatible assessor.
pub struct OpenAiAssessor {
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    settings: AssessorSettings,
    client: reqwest::Client,
}

impl OpenAiAssessor {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        org_id: Option<String>,
        settings: AssessorSettings,
    ) -> Result<Self, ProviderError> {
        let temperature = effective_temperature(&settings.model, settings.temperature);
        if temperature != settings.temperature {
            tracing::debug!(
                model = %settings.model,
                requested = settings.temperature,
                "model uses a fixed temperature of {temperature}"
            );
        }

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_id,
            settings: AssessorSettings {
                temperature,
                ..settings
            },
            client: http_client()?,
        })
    }

    /// Settings after temperature pinning.
    pub fn settings(&self) -> &AssessorSettings {
        &self.settings
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    messages: Vec<OpenAiMessage>,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: OpenAiUsage,
    model: String,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

fn error_message(body: String) -> String {
    serde_json::from_str::<OpenAiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[async_trait]
impl Assessor for OpenAiAssessor {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.settings.model))]
    async fn judge(&self, request: &AssessRequest) -> Result<AssessResponse, ProviderError> {
        let start = Instant::now();
        let model = &self.settings.model;

        // Fixed-temperature models take the newer token limit field.
        let (max_tokens, max_completion_tokens) = if has_fixed_temperature(model) {
            (None, Some(self.settings.max_tokens))
        } else {
            (Some(self.settings.max_tokens), None)
        };

        let body = OpenAiRequest {
            model: model.clone(),
            temperature: self.settings.temperature,
            max_tokens,
            max_completion_tokens,
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: ASSESSOR_SYSTEM_PROMPT.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: build_prompt(request),
                },
            ],
        };

        let mut req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json");

        if let Some(org) = &self.org_id {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req.json(&body).send().await.map_err(transport_error)?;
        let response = check_status(response, model, error_message).await?;

        let api_response: OpenAiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(AssessResponse {
            content,
            model: api_response.model,
            token_usage: TokenUsage {
                prompt_tokens: api_response.usage.prompt_tokens,
                completion_tokens: api_response.usage.completion_tokens,
                total_tokens: api_response.usage.total_tokens,
            },
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
