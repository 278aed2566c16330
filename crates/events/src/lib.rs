//! Shared event contracts for the assistant core.
//!
//! This crate defines the formal contracts (DTOs) for events that flow
//! between the foreground flow, the wake-word monitor, and any listeners.
//! Using shared types prevents runtime deserialization errors from
//! mismatched field names.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{emit_typed, BroadcastEventBus, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus};

use serde::{Deserialize, Serialize};

/// Control signals addressed to the wake-word monitor.
///
/// Producers: foreground flow, any caller
/// Consumers: wake-word monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlSignal {
    /// Foreground session needs the microphone.
    ChatSessionOpened,
    /// Foreground session released the microphone.
    ChatSessionClosed,
    PauseListening,
    ResumeListening,
}

impl ControlSignal {
    /// Topic this signal travels under when bridged over a bus.
    pub fn topic(&self) -> &'static str {
        match self {
            ControlSignal::ChatSessionOpened => event_names::CHAT_SESSION_OPENED,
            ControlSignal::ChatSessionClosed => event_names::CHAT_SESSION_CLOSED,
            ControlSignal::PauseListening => event_names::PAUSE_LISTENING,
            ControlSignal::ResumeListening => event_names::RESUME_LISTENING,
        }
    }

    /// Parse a signal from its topic name.
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            event_names::CHAT_SESSION_OPENED => Some(ControlSignal::ChatSessionOpened),
            event_names::CHAT_SESSION_CLOSED => Some(ControlSignal::ChatSessionClosed),
            event_names::PAUSE_LISTENING => Some(ControlSignal::PauseListening),
            event_names::RESUME_LISTENING => Some(ControlSignal::ResumeListening),
            _ => None,
        }
    }
}

/// Event emitted for every final recognition result.
///
/// Producers: recognition session
/// Consumers: any interested listener (UI, logs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceResultEvent {
    /// Best transcript candidate.
    pub text: String,
}

/// Event emitted when recognition fails in a way worth reporting.
///
/// Producers: recognition session, wake-word monitor
/// Consumers: any interested listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceErrorEvent {
    /// Human-readable error message.
    pub message: String,
}

/// Hand-off event emitted when the wake phrase is detected.
///
/// Producers: wake-word monitor
/// Consumers: foreground flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WakeWordDetectedEvent {
    /// The configured wake phrase.
    pub phrase: String,
    /// Transcript that contained the phrase.
    pub transcript: String,
    /// Timestamp in milliseconds since epoch.
    #[serde(default)]
    pub ts_ms: i64,
}

/// Event emitted whenever the monitor status text changes.
///
/// Producers: wake-word monitor
/// Consumers: persistent status indicator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorStatusChangedEvent {
    /// Monitor state name (e.g., "listening", "suspended").
    pub state: String,
    /// Short status line suitable for display.
    pub text: String,
}

/// Current time in milliseconds since epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Foreground chat session opened.
    pub const CHAT_SESSION_OPENED: &str = "control:chat_session_opened";
    /// Foreground chat session closed.
    pub const CHAT_SESSION_CLOSED: &str = "control:chat_session_closed";
    /// Pause wake-word listening.
    pub const PAUSE_LISTENING: &str = "control:pause_listening";
    /// Resume wake-word listening.
    pub const RESUME_LISTENING: &str = "control:resume_listening";
    /// Final recognition result.
    pub const VOICE_RESULT: &str = "voice:result";
    /// Recognition error.
    pub const VOICE_ERROR: &str = "voice:error";
    /// Wake phrase detected.
    pub const WAKE_WORD_DETECTED: &str = "wake:detected";
    /// Monitor status text changed.
    pub const MONITOR_STATUS_CHANGED: &str = "monitor:status_changed";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_result_deserialize() {
        let json = r#"{"text": "open the one"}"#;
        let event: VoiceResultEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.text, "open the one");
    }

    #[test]
    fn test_wake_detected_deserialize_minimal() {
        let json = r#"{"phrase": "open the one", "transcript": "hey open the one"}"#;
        let event: WakeWordDetectedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.phrase, "open the one");
        assert_eq!(event.ts_ms, 0);
    }

    #[test]
    fn test_control_signal_json_shape() {
        let json = serde_json::to_value(ControlSignal::ChatSessionOpened).unwrap();
        assert_eq!(json["type"], "chat_session_opened");

        let parsed: ControlSignal =
            serde_json::from_str(r#"{"type": "resume_listening"}"#).unwrap();
        assert_eq!(parsed, ControlSignal::ResumeListening);
    }

    #[test]
    fn test_control_signal_topics() {
        for signal in [
            ControlSignal::ChatSessionOpened,
            ControlSignal::ChatSessionClosed,
            ControlSignal::PauseListening,
            ControlSignal::ResumeListening,
        ] {
            assert_eq!(ControlSignal::from_topic(signal.topic()), Some(signal));
        }
        assert_eq!(ControlSignal::from_topic(event_names::VOICE_RESULT), None);
    }
}
