//! End-to-end replies: routing, dispatch, scripted answers, and the AI.

use async_trait::async_trait;
use murmur_apps::{AppResolver, StaticCatalog};
use murmur_assistant::ai::{AiResult, APOLOGY, OFFLINE_REPLY};
use murmur_assistant::{
    AiError, AiProvider, Assistant, OfflineProvider, OpenRouterProvider, Personality, JOKES,
};
use murmur_config::AiConfig;
use murmur_dispatch::mock::MockDevice;
use murmur_dispatch::SystemActionDispatcher;
use murmur_router::Command;
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records prompts and answers with a fixed line.
struct EchoProvider {
    seen: Mutex<Vec<(String, Personality)>>,
}

#[async_trait]
impl AiProvider for EchoProvider {
    async fn respond(&self, input: &str, personality: &Personality) -> AiResult<String> {
        self.seen
            .lock()
            .unwrap()
            .push((input.to_string(), *personality));
        Ok(format!("You asked: {input}"))
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

struct FailingProvider;

#[async_trait]
impl AiProvider for FailingProvider {
    async fn respond(&self, _input: &str, _personality: &Personality) -> AiResult<String> {
        Err(AiError::RateLimited)
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

fn assistant_with(ai: Arc<dyn AiProvider>) -> Assistant {
    let catalog = StaticCatalog::from_pairs(&[
        ("com.whatsapp", "WhatsApp"),
        ("com.spotify.music", "Spotify"),
    ]);
    let dispatcher = SystemActionDispatcher::new(
        Arc::new(MockDevice::new()),
        AppResolver::new(Arc::new(catalog)),
    );
    Assistant::new(dispatcher, ai)
}

fn echo() -> Arc<EchoProvider> {
    Arc::new(EchoProvider {
        seen: Mutex::new(Vec::new()),
    })
}

// ============================================================================
// Routing to handlers
// ============================================================================

mod handlers {
    use super::*;

    #[tokio::test]
    async fn test_device_command_is_dispatched() {
        let assistant = assistant_with(Arc::new(OfflineProvider));
        let reply = assistant.handle("open whats app").await;
        assert_eq!(reply.text, "Opening WhatsApp");
        assert!(matches!(reply.command, Command::AppLaunch { .. }));
    }

    #[tokio::test]
    async fn test_set_trait_updates_personality() {
        let assistant = assistant_with(Arc::new(OfflineProvider));
        let reply = assistant.handle("set sarcasm to 50").await;
        assert_eq!(reply.text, "Sarcasm setting adjusted to 50%");
        assert_eq!(assistant.personality().sarcasm, 50);

        let reply = assistant.handle("show settings").await;
        assert_eq!(
            reply.text,
            "Current settings:\nHumor: 100%\nHonesty: 100%\nSarcasm: 50%"
        );

        assistant.handle("reset all settings").await;
        assert_eq!(assistant.personality(), Personality::default());
    }

    #[tokio::test]
    async fn test_out_of_range_trait_is_rejected() {
        let assistant = assistant_with(Arc::new(OfflineProvider));
        let reply = assistant.handle("set humor to 150").await;
        assert_eq!(
            reply.text,
            "Invalid humor value. Please specify a number between 0 and 100."
        );
        assert_eq!(assistant.personality().humor, 100);
    }

    #[tokio::test]
    async fn test_jokes_follow_humor() {
        let assistant = assistant_with(Arc::new(OfflineProvider));
        assert_eq!(assistant.handle("tell me a joke").await.text, JOKES[0]);
        assert_eq!(assistant.handle("tell me a joke").await.text, JOKES[1]);

        assistant.handle("set humor to 0").await;
        assert_eq!(
            assistant.handle("tell me a joke").await.text,
            "Sorry, my humor setting is currently set to 0%. I'm not allowed to tell jokes."
        );
    }

    #[tokio::test]
    async fn test_free_text_goes_to_ai_with_personality() {
        let ai = echo();
        let assistant = assistant_with(ai.clone());
        assistant.handle("set honesty to 20").await;
        let reply = assistant.handle("Why is the sky blue?").await;

        assert_eq!(reply.text, "You asked: Why is the sky blue?");
        let seen = ai.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1.honesty, 20);
    }

    #[tokio::test]
    async fn test_ai_errors_become_user_messages() {
        let assistant = assistant_with(Arc::new(FailingProvider));
        let reply = assistant.handle("what is the meaning of life").await;
        assert_eq!(
            reply.text,
            "Rate limit exceeded. Please try again in a few moments."
        );
    }

    #[tokio::test]
    async fn test_offline_provider_answers() {
        let assistant = assistant_with(Arc::new(OfflineProvider));
        assert_eq!(assistant.handle("what is rust").await.text, OFFLINE_REPLY);
    }
}

// ============================================================================
// OpenRouter wire contract
// ============================================================================

mod openrouter {
    use super::*;

    fn provider(server: &MockServer) -> OpenRouterProvider {
        let config = AiConfig {
            base_url: format!("{}/api/v1", server.uri()),
            model: "test/model".to_string(),
            ..AiConfig::default()
        };
        OpenRouterProvider::new(&config, "test-key").unwrap()
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
    }

    #[tokio::test]
    async fn test_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "test/model",
                "max_tokens": 100,
                "temperature": 0.6,
                "stream": false
            })))
            .respond_with(completion("TARS: Hello, human. Nice weather. Anyway."))
            .expect(1)
            .mount(&server)
            .await;

        let answer = provider(&server)
            .respond("hi", &Personality::default())
            .await
            .unwrap();
        assert_eq!(answer, "Hello, human. Nice weather.");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let cases = [
            (401, "Invalid API key"),
            (403, "not authorized"),
            (404, "endpoint not available"),
            (429, "Rate limit exceeded"),
            (503, "Server error"),
        ];
        for (status, expected) in cases {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status).set_body_string("nope"))
                .mount(&server)
                .await;

            let err = provider(&server)
                .respond("hi", &Personality::default())
                .await
                .unwrap_err();
            assert!(
                err.user_message().contains(expected),
                "{status}: {}",
                err.user_message()
            );
        }
    }

    #[tokio::test]
    async fn test_empty_content_is_an_apology() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("  ...  "))
            .mount(&server)
            .await;

        let answer = provider(&server)
            .respond("hi", &Personality::default())
            .await
            .unwrap();
        assert_eq!(answer, APOLOGY);
    }

    #[tokio::test]
    async fn test_missing_choices_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = provider(&server)
            .respond("hi", &Personality::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(_)));
    }
}
