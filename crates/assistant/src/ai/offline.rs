use super::{AiProvider, AiResult};
use crate::personality::Personality;
use async_trait::async_trait;

pub const OFFLINE_REPLY: &str =
    "I can't answer that right now because no AI service is configured.";

/// Used when no API key is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

#[async_trait]
impl AiProvider for OfflineProvider {
    async fn respond(&self, _input: &str, _personality: &Personality) -> AiResult<String> {
        Ok(OFFLINE_REPLY.to_string())
    }

    fn model_name(&self) -> &str {
        "offline"
    }
}
