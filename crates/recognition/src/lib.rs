//! Speech recognition session contract.
//!
//! The platform speech engine is an external collaborator. This crate pins
//! down what the wake-word monitor needs from it: a factory that can tell
//! whether recognition exists on the device, an engine with start/stop and
//! an explicit destroy, and a callback surface delivered as
//! [`RecognitionEvent`] values through a [`RecognitionSink`].

mod engine;
mod error;
pub mod fake;
mod params;
mod result;

pub use engine::{RecognitionEvent, RecognitionSink, RecognizerFactory, SpeechRecognizer};
pub use error::{ErrorSeverity, RecognitionError, RecognitionErrorKind};
pub use params::{ListenParams, ListeningMode, DEFAULT_LANGUAGE, DEFAULT_MAX_RESULTS};
pub use result::RecognitionResult;

/// Result type for recognition operations.
pub type Result<T> = std::result::Result<T, RecognitionError>;
