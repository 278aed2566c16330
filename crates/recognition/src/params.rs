//! Listening parameters per mode.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of transcript candidates requested per turn.
pub const DEFAULT_MAX_RESULTS: u8 = 3;

/// Recognition language tag.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Timeout tuning profile.
///
/// Passive is used while waiting for the wake phrase and tolerates longer
/// pauses; Active is tighter for an engaged conversation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningMode {
    #[default]
    Passive,
    Active,
}

impl std::fmt::Display for ListeningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListeningMode::Passive => write!(f, "passive"),
            ListeningMode::Active => write!(f, "active"),
        }
    }
}

/// Parameters handed to the engine on every `start_listening`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenParams {
    pub language: String,
    pub max_results: u8,
    pub partial_results: bool,
    pub min_speech_length: Duration,
    pub complete_silence: Duration,
    pub possibly_complete_silence: Duration,
}

impl ListenParams {
    pub fn for_mode(mode: ListeningMode) -> Self {
        let (min_len, complete, possibly) = match mode {
            ListeningMode::Passive => (1000, 1500, 1000),
            ListeningMode::Active => (500, 1000, 500),
        };

        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            partial_results: true,
            min_speech_length: Duration::from_millis(min_len),
            complete_silence: Duration::from_millis(complete),
            possibly_complete_silence: Duration::from_millis(possibly),
        }
    }
}

impl Default for ListenParams {
    fn default() -> Self {
        Self::for_mode(ListeningMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passive_is_more_tolerant_than_active() {
        let passive = ListenParams::for_mode(ListeningMode::Passive);
        let active = ListenParams::for_mode(ListeningMode::Active);

        assert!(passive.complete_silence > active.complete_silence);
        assert!(passive.min_speech_length > active.min_speech_length);
        assert_eq!(passive.complete_silence, Duration::from_millis(1500));
        assert_eq!(active.possibly_complete_silence, Duration::from_millis(500));
    }

    #[test]
    fn test_defaults() {
        let params = ListenParams::default();
        assert_eq!(params.max_results, 3);
        assert!(params.partial_results);
        assert_eq!(params.language, "en-US");
    }

    #[test]
    fn test_mode_serde() {
        let mode: ListeningMode = serde_json::from_str(r#""active""#).unwrap();
        assert_eq!(mode, ListeningMode::Active);
        assert_eq!(mode.to_string(), "active");
    }
}
