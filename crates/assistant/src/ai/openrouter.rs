//! OpenAI-compatible chat completions over HTTP (OpenRouter by default).

use super::clean::clean_response;
use super::{AiError, AiProvider, AiResult};
use crate::personality::Personality;
use crate::replies::ASSISTANT_NAME;
use async_trait::async_trait;
use murmur_config::AiConfig;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Replies are one or two spoken lines.
pub const MAX_TOKENS: u32 = 100;
pub const TEMPERATURE: f64 = 0.6;

const APP_TITLE: &str = "murmur";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenRouterProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenRouterProvider {
    pub fn new(config: &AiConfig, api_key: impl Into<String>) -> AiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| AiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AiProvider for OpenRouterProvider {
    async fn respond(&self, input: &str, personality: &Personality) -> AiResult<String> {
        let prompt = system_prompt(personality);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt,
                },
                ChatMessage {
                    role: "user",
                    content: input,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            stream: false,
        };

        tracing::debug!(model = %self.model, chars = input.len(), "Requesting AI reply");

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "AI request rejected");
            return Err(status_error(status, body));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| AiError::InvalidResponse("no message content".to_string()))?;

        Ok(clean_response(&content))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Persona instructions for the current personality.
pub fn system_prompt(personality: &Personality) -> String {
    let mut prompt = format!(
        "You are {ASSISTANT_NAME}, an advanced AI assistant. Respond in 1-2 lines maximum.\n{}\n{}",
        personality.humor_style(),
        personality.honesty_style(),
    );
    if let Some(sarcasm) = personality.sarcasm_style() {
        prompt.push('\n');
        prompt.push_str(sarcasm);
    }
    prompt
}

fn status_error(status: StatusCode, body: String) -> AiError {
    match status {
        StatusCode::UNAUTHORIZED => AiError::InvalidApiKey,
        StatusCode::FORBIDDEN => AiError::Forbidden,
        StatusCode::NOT_FOUND => AiError::EndpointUnavailable,
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
        s if s.is_server_error() => AiError::Server {
            status: s.as_u16(),
        },
        s => AiError::Http {
            status: s.as_u16(),
            body,
        },
    }
}
