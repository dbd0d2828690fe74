use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::catalog;
use crate::config::Config;
use crate::llm::{GenerationError, ImageGenerator};

const DESCRIPTION_PROMPT: &str = "Analyze this image and provide a detailed description about \
the gender, hairstyle, clothing, and overall likeness, including facial features and expression.";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Option<Vec<GeneratedImage>>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(message) = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .or_else(|| value.get("message").and_then(|v| v.as_str()))
        {
            return message.to_string();
        }
        return truncate_for_log(&value.to_string(), 2000);
    }

    truncate_for_log(trimmed, 2000)
}

/// Azure OpenAI client: GPT-4o for image descriptions, DALL-E 3 for
/// stylized generations. Every request carries the client-wide timeout.
pub struct AzureOpenAiClient {
    config: Arc<Config>,
    client: Client,
}

impl AzureOpenAiClient {
    pub fn new(config: Arc<Config>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(AzureOpenAiClient { config, client })
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        let endpoint = self.config.openai_endpoint.trim_end_matches('/');
        format!(
            "{endpoint}/openai/deployments/{deployment}/{operation}?api-version={}",
            self.config.openai_api_version
        )
    }

    fn redact_api_key(&self, text: &str) -> String {
        let key = self.config.openai_api_key.trim();
        if key.is_empty() {
            return text.to_string();
        }
        text.replace(key, "[redacted]")
    }

    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value, GenerationError> {
        let response = self
            .client
            .post(url)
            .header("api-key", &self.config.openai_api_key)
            .json(payload)
            .send()
            .await
            .map_err(|err| GenerationError(self.redact_api_key(&err.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = summarize_error_body(&body);
            return Err(GenerationError(format!(
                "upstream call failed with status {status}: {}",
                self.redact_api_key(&detail)
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| GenerationError(self.redact_api_key(&err.to_string())))
    }
}

#[async_trait]
impl ImageGenerator for AzureOpenAiClient {
    async fn describe(&self, image_url: &str) -> Result<String, GenerationError> {
        let url = self.deployment_url(&self.config.openai_gpt_deployment, "chat/completions");
        let payload = json!({
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": DESCRIPTION_PROMPT },
                        { "type": "image_url", "image_url": { "url": image_url } }
                    ]
                }
            ],
            "max_tokens": self.config.description_max_tokens
        });

        let raw = self.post_json(&url, &payload).await?;
        let parsed: ChatResponse = serde_json::from_value(raw)
            .map_err(|err| GenerationError(format!("unexpected chat response shape: {err}")))?;

        let description = parsed
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError("description response contained no content".to_string()))?;

        debug!(
            "Generated source image description: {}",
            truncate_for_log(&description, 200)
        );
        Ok(description)
    }

    async fn stylize(
        &self,
        description: &str,
        filter_name: &str,
    ) -> Result<String, GenerationError> {
        let url = self.deployment_url(&self.config.openai_dalle_deployment, "images/generations");
        let prompt = catalog::prompt_for(description, filter_name);
        let payload = json!({ "prompt": prompt, "n": 1 });

        let raw = self.post_json(&url, &payload).await?;
        let parsed: ImageGenerationResponse = serde_json::from_value(raw).map_err(|err| {
            GenerationError(format!("unexpected image generation response shape: {err}"))
        })?;

        parsed
            .data
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| {
                GenerationError("image generation response contained no url".to_string())
            })
    }

    async fn fetch(&self, image_url: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|err| GenerationError(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError(format!(
                "generated image fetch failed with status {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| GenerationError(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}
