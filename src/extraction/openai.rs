use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::DEFAULT_OPENAI_BASE_URL;
use crate::error::{PipelineError, Result};
use crate::extraction::request::{ExtractionRequest, Message};
use crate::extraction::schema::JsonSchema;
use crate::extraction::traits::ExtractionClient;

/// Chat completions client using `json_schema` structured outputs
#[derive(Clone)]
pub struct OpenAiExtractor {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Set a custom base URL (for proxies, compatible gateways, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completion_request<'a>(&'a self, request: &'a ExtractionRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: &request.messages,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: &request.schema,
            },
        }
    }
}

#[async_trait]
impl ExtractionClient for OpenAiExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<String> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.completion_request(request))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                PipelineError::Extraction(format!("Failed to send request: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::Extraction(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, error = %body, "OpenAI API error");
            return Err(PipelineError::Extraction(format!(
                "OpenAI API error ({}): {}",
                status, body
            )));
        }

        let content = completion_content(&body)?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI structured output"
        );

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: &'a JsonSchema,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Pull the first choice's content out of a chat completions response body
fn completion_content(body: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| PipelineError::Extraction(format!("Failed to unmarshal response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(PipelineError::Extraction(format!(
            "OpenAI API error: {}",
            error.message
        )));
    }

    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| PipelineError::Extraction("No choices in response".into()))?;

    if let Some(refusal) = message.refusal {
        return Err(PipelineError::Extraction(format!("Model refused: {}", refusal)));
    }

    match message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(PipelineError::Extraction("Empty response content".into())),
    }
}
