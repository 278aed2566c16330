use crate::{ListenParams, RecognitionErrorKind, RecognitionResult};
use std::sync::Arc;

/// Callback surface of a running engine.
///
/// Mirrors the engine's listener methods one-to-one so the consumer can run
/// them through an explicit state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    ReadyForSpeech,
    BeginningOfSpeech,
    PartialResult(RecognitionResult),
    FinalResult(RecognitionResult),
    Error(RecognitionErrorKind),
    EndOfSpeech,
}

impl RecognitionEvent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            RecognitionEvent::ReadyForSpeech => "ready",
            RecognitionEvent::BeginningOfSpeech => "beginning_of_speech",
            RecognitionEvent::PartialResult(_) => "partial",
            RecognitionEvent::FinalResult(_) => "final",
            RecognitionEvent::Error(_) => "error",
            RecognitionEvent::EndOfSpeech => "end_of_speech",
        }
    }

    /// Whether this event ends the current recognition attempt.
    pub fn ends_attempt(&self) -> bool {
        matches!(
            self,
            RecognitionEvent::FinalResult(_) | RecognitionEvent::Error(_)
        )
    }
}

/// Callback type for engine events.
///
/// Engines may invoke the sink from any thread; consumers are expected to
/// forward events onto their own serialized context.
pub type RecognitionSink = Arc<dyn Fn(RecognitionEvent) + Send + Sync + 'static>;

/// One engine instance.
///
/// The engine is not reentrant: callers must never issue a second
/// `start_listening` before the previous attempt ended or was stopped.
pub trait SpeechRecognizer: Send {
    /// Begin one recognition attempt.
    fn start_listening(&mut self, params: &ListenParams) -> crate::Result<()>;

    /// Stop the current attempt.
    ///
    /// Returns once the engine has released the microphone. No further
    /// events are delivered for the stopped attempt.
    fn stop_listening(&mut self);

    /// Release the engine. The instance must not be used afterwards.
    fn destroy(&mut self);
}

/// Creates engine instances.
pub trait RecognizerFactory: Send + Sync {
    /// Human-readable engine name (e.g., "platform", "console").
    fn name(&self) -> &str;

    /// Whether speech recognition exists on this device at all.
    fn is_available(&self) -> bool;

    /// Create a fresh engine delivering its callbacks to `sink`.
    fn create(&self, sink: RecognitionSink) -> crate::Result<Box<dyn SpeechRecognizer>>;
}
