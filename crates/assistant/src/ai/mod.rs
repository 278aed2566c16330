//! Remote AI collaborator.

mod clean;
mod offline;
mod openrouter;

pub use clean::{clean_response, APOLOGY, MAX_REPLY_CHARS, MAX_REPLY_SENTENCES};
pub use offline::{OfflineProvider, OFFLINE_REPLY};
pub use openrouter::{system_prompt, OpenRouterProvider, MAX_TOKENS, TEMPERATURE};

use crate::personality::Personality;
use async_trait::async_trait;
use murmur_config::AiConfig;
use std::sync::Arc;

/// Result type for AI calls.
pub type AiResult<T> = Result<T, AiError>;

/// AI failures. `Display` is the sentence spoken to the user.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Invalid API key. Please check your OpenRouter API key in settings.")]
    InvalidApiKey,

    #[error("API key is not authorized. Please check your API key permissions.")]
    Forbidden,

    #[error("API endpoint not available. Please try again later.")]
    EndpointUnavailable,

    #[error("Rate limit exceeded. Please try again in a few moments.")]
    RateLimited,

    #[error("Server error. Please try again later.")]
    Server { status: u16 },

    #[error("API error ({status}). Please try again later.")]
    Http { status: u16, body: String },

    #[error("I couldn't reach the AI service. Please check your internet connection.")]
    Network(String),

    #[error("I received an unexpected response from the AI service.")]
    InvalidResponse(String),
}

impl AiError {
    /// Message suitable for speaking back.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// A chat model that answers free-form questions in character.
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn respond(&self, input: &str, personality: &Personality) -> AiResult<String>;

    fn model_name(&self) -> &str;
}

/// HTTP provider when an API key is configured, offline otherwise.
pub fn provider_from_config(config: &AiConfig) -> AiResult<Arc<dyn AiProvider>> {
    match config.api_key() {
        Some(key) => Ok(Arc::new(OpenRouterProvider::new(config, key)?)),
        None => {
            tracing::info!(env = %config.api_key_env, "No AI API key set, answering offline");
            Ok(Arc::new(OfflineProvider))
        }
    }
}
