//! Monitor state and the status surface shown in persistent indicators.

use murmur_recognition::ListeningMode;
use serde::Serialize;

/// Listening session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    /// Not listening and nothing scheduled yet.
    Idle,
    /// A recognition attempt is running.
    Listening,
    /// Speech ended; waiting for the engine's final result.
    Processing,
    /// Waiting for a restart or recreate timer.
    CoolingDown,
    /// A foreground session or a pause request owns the microphone.
    Suspended,
    /// Torn down; nothing will run again.
    Stopped,
}

impl MonitorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorState::Idle => "idle",
            MonitorState::Listening => "listening",
            MonitorState::Processing => "processing",
            MonitorState::CoolingDown => "cooling_down",
            MonitorState::Suspended => "suspended",
            MonitorState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the monitor for status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorStatus {
    pub state: MonitorState,
    /// Short human-readable line (e.g., "Listening for 'open the one'").
    pub text: String,
    pub consecutive_errors: u32,
    pub mode: ListeningMode,
    pub wake_phrase: String,
}

impl MonitorStatus {
    pub fn is_running(&self) -> bool {
        self.state != MonitorState::Stopped
    }

    pub fn is_listening(&self) -> bool {
        matches!(
            self.state,
            MonitorState::Listening | MonitorState::Processing
        )
    }
}

pub(crate) fn listening_text(phrase: &str) -> String {
    format!("Listening for '{phrase}'")
}

pub(crate) const STARTING_TEXT: &str = "Starting wake word detection";
pub(crate) const DETECTED_TEXT: &str = "Wake word detected";
pub(crate) const COOLING_DOWN_TEXT: &str = "Cooling down after errors...";
pub(crate) const WAITING_FOR_MIC_TEXT: &str = "Waiting for microphone";
pub(crate) const UNAVAILABLE_TEXT: &str = "Speech recognition unavailable";
pub(crate) const STOPPED_TEXT: &str = "Stopped";

pub(crate) fn paused_text(reason: &str) -> String {
    format!("Paused: {reason}")
}
