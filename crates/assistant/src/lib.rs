//! Assistant front end.
//!
//! Composes routing, device dispatch, scripted replies, and the AI
//! collaborator into a single `handle(text)` call.

pub mod ai;
mod assistant;
mod personality;
mod replies;

pub use ai::{provider_from_config, AiError, AiProvider, AiResult, OfflineProvider, OpenRouterProvider};
pub use assistant::{Assistant, Reply};
pub use personality::Personality;
pub use replies::{ScriptedReplies, ASSISTANT_NAME, HELP, JOKES};
