//! One utterance in, one spoken reply out.

use crate::ai::AiProvider;
use crate::personality::Personality;
use crate::replies::ScriptedReplies;
use murmur_dispatch::SystemActionDispatcher;
use murmur_router::{route, Command};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Reply text plus the command it answered.
#[derive(Debug, Serialize)]
pub struct Reply {
    pub text: String,
    pub command: Command,
}

pub struct Assistant {
    dispatcher: SystemActionDispatcher,
    ai: Arc<dyn AiProvider>,
    replies: ScriptedReplies,
    personality: Mutex<Personality>,
}

impl Assistant {
    pub fn new(dispatcher: SystemActionDispatcher, ai: Arc<dyn AiProvider>) -> Self {
        Self {
            dispatcher,
            ai,
            replies: ScriptedReplies::new(),
            personality: Mutex::new(Personality::default()),
        }
    }

    pub fn personality(&self) -> Personality {
        *self.lock_personality()
    }

    fn lock_personality(&self) -> std::sync::MutexGuard<'_, Personality> {
        self.personality.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Route and answer. Never fails; AI errors become their user message.
    pub async fn handle(&self, text: &str) -> Reply {
        let command = route(text);

        if let Some(outcome) = self.dispatcher.dispatch(&command) {
            return Reply {
                text: outcome.message,
                command,
            };
        }

        let text = match &command {
            Command::ScriptedReply { reply } => {
                let mut personality = self.lock_personality();
                self.replies.reply(reply, &mut personality)
            }
            Command::AiQuery { text } => {
                let personality = self.personality();
                match self.ai.respond(text, &personality).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        tracing::warn!(error = ?e, model = self.ai.model_name(), "AI reply failed");
                        e.user_message()
                    }
                }
            }
            // Device commands always produce an outcome above.
            other => {
                tracing::error!(command = other.kind(), "Device command was not dispatched");
                "Sorry, I couldn't do that.".to_string()
            }
        };

        Reply { text, command }
    }
}
