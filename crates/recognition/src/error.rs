//! Recognition error taxonomy.

use serde::{Deserialize, Serialize};

/// How the monitor should react to a recognition error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Expected and frequent; restart without touching the error budget.
    Benign,
    /// Unexpected; counts against the error budget.
    Serious,
    /// Recognition cannot work on this device at all.
    Fatal,
}

/// Error kinds reported by the engine through the callback surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionErrorKind {
    NoMatch,
    SpeechTimeout,
    Audio,
    Client,
    Network,
    NetworkTimeout,
    Server,
    InsufficientPermissions,
    RecognizerBusy,
    Unavailable,
    Other(i32),
}

impl RecognitionErrorKind {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RecognitionErrorKind::NoMatch | RecognitionErrorKind::SpeechTimeout => {
                ErrorSeverity::Benign
            }
            RecognitionErrorKind::Unavailable => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Serious,
        }
    }

    pub fn is_benign(&self) -> bool {
        self.severity() == ErrorSeverity::Benign
    }

    /// User-facing description.
    pub fn message(&self) -> String {
        match self {
            RecognitionErrorKind::NoMatch => "No speech detected".to_string(),
            RecognitionErrorKind::SpeechTimeout => "No speech input".to_string(),
            RecognitionErrorKind::Audio => "Audio recording error".to_string(),
            RecognitionErrorKind::Client => "Client side error".to_string(),
            RecognitionErrorKind::Network => "Network error".to_string(),
            RecognitionErrorKind::NetworkTimeout => "Network timeout".to_string(),
            RecognitionErrorKind::Server => "Server error".to_string(),
            RecognitionErrorKind::InsufficientPermissions => {
                "Insufficient permissions".to_string()
            }
            RecognitionErrorKind::RecognizerBusy => "Recognition service busy".to_string(),
            RecognitionErrorKind::Unavailable => {
                "Speech recognition is not available on this device".to_string()
            }
            RecognitionErrorKind::Other(code) => format!("Unknown error ({code})"),
        }
    }
}

impl std::fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Errors returned synchronously by factory and engine calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    #[error("speech recognition is not available on this device")]
    Unavailable,

    #[error("failed to create recognizer: {0}")]
    CreateFailed(String),

    #[error("failed to start listening: {0}")]
    StartFailed(RecognitionErrorKind),

    #[error("recognizer already destroyed")]
    Destroyed,
}

impl RecognitionError {
    /// Error kind this failure should be accounted as.
    pub fn kind(&self) -> RecognitionErrorKind {
        match self {
            RecognitionError::Unavailable => RecognitionErrorKind::Unavailable,
            RecognitionError::CreateFailed(_) | RecognitionError::Destroyed => {
                RecognitionErrorKind::Client
            }
            RecognitionError::StartFailed(kind) => *kind,
        }
    }
}
