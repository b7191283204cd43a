//! Anthropic messages assessor.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use markwise_core::prompt::{build_prompt, ASSESSOR_SYSTEM_PROMPT};
use markwise_core::traits::{AssessRequest, AssessResponse, Assessor, TokenUsage};

use crate::config::AssessorSettings;
use crate::error::{check_status, http_client, transport_error, ProviderError};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Anthropic API assessor.
pub struct AnthropicAssessor {
    api_key: String,
    base_url: String,
    settings: AssessorSettings,
    client: reqwest::Client,
}

impl AnthropicAssessor {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        settings: AssessorSettings,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            settings,
            client: http_client()?,
        })
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    #[serde(default)]
    usage: AnthropicUsage,
    model: String,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

fn error_message(body: String) -> String {
    serde_json::from_str::<AnthropicError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[async_trait]
impl Assessor for AnthropicAssessor {
    fn name(&self) -> &str {
        "anthropic"
    }

    #[instrument(skip(self, request), fields(model = %self.settings.model))]
    async fn judge(&self, request: &AssessRequest) -> Result<AssessResponse, ProviderError> {
        let start = Instant::now();

        let body = AnthropicRequest {
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            // Anthropic accepts 0.0..=1.0.
            temperature: self.settings.temperature.clamp(0.0, 1.0),
            system: ASSESSOR_SYSTEM_PROMPT.to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: build_prompt(request),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, &self.settings.model, error_message).await?;

        let api_response: AnthropicResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let content = api_response
            .content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        let usage = &api_response.usage;

        Ok(AssessResponse {
            content,
            model: api_response.model,
            token_usage: TokenUsage {
                prompt_tokens: usage.input_tokens,
                completion_tokens: usage.output_tokens,
                total_tokens: usage.input_tokens + usage.output_tokens,
            },
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
