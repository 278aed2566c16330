//! Speech engine backed by typed lines.
//!
//! Each line fed while an attempt is listening becomes one recognition
//! turn. Lines typed while the engine is stopped are rejected so the
//! caller can tell the user.

use murmur_recognition::{
    ListenParams, RecognitionErrorKind, RecognitionEvent, RecognitionResult, RecognitionSink,
    RecognizerFactory, SpeechRecognizer,
};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct EngineState {
    sink: Option<RecognitionSink>,
    listening: bool,
}

#[derive(Clone, Default)]
pub struct ConsoleRecognizerFactory {
    state: Arc<Mutex<EngineState>>,
}

impl ConsoleRecognizerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `line` as one turn. Returns false when nothing is listening.
    pub fn feed(&self, line: &str) -> bool {
        let sink = {
            let mut state = lock(&self.state);
            if !state.listening {
                return false;
            }
            state.listening = false;
            state.sink.clone()
        };
        let Some(sink) = sink else {
            return false;
        };

        let text = line.trim();
        if text.is_empty() {
            sink(RecognitionEvent::Error(RecognitionErrorKind::NoMatch));
        } else {
            sink(RecognitionEvent::BeginningOfSpeech);
            sink(RecognitionEvent::EndOfSpeech);
            sink(RecognitionEvent::FinalResult(RecognitionResult::single(text)));
        }
        true
    }
}

fn lock(state: &Mutex<EngineState>) -> MutexGuard<'_, EngineState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

impl RecognizerFactory for ConsoleRecognizerFactory {
    fn name(&self) -> &str {
        "console"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create(&self, sink: RecognitionSink) -> murmur_recognition::Result<Box<dyn SpeechRecognizer>> {
        let mut state = lock(&self.state);
        state.sink = Some(sink);
        state.listening = false;
        Ok(Box::new(ConsoleRecognizer {
            state: Arc::clone(&self.state),
        }))
    }
}

struct ConsoleRecognizer {
    state: Arc<Mutex<EngineState>>,
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn start_listening(&mut self, _params: &ListenParams) -> murmur_recognition::Result<()> {
        let sink = {
            let mut state = lock(&self.state);
            state.listening = true;
            state.sink.clone()
        };
        if let Some(sink) = sink {
            sink(RecognitionEvent::ReadyForSpeech);
        }
        Ok(())
    }

    fn stop_listening(&mut self) {
        lock(&self.state).listening = false;
    }

    fn destroy(&mut self) {
        let mut state = lock(&self.state);
        state.listening = false;
        state.sink = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture() -> (RecognitionSink, Arc<Mutex<Vec<RecognitionEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink: RecognitionSink = Arc::new(move |event| {
            seen_clone.lock().unwrap().push(event);
        });
        (sink, seen)
    }

    #[test]
    fn test_lines_only_count_while_listening() {
        let factory = ConsoleRecognizerFactory::new();
        let (sink, seen) = capture();
        let mut engine = factory.create(sink).unwrap();

        assert!(!factory.feed("hello"));
        engine.start_listening(&ListenParams::default()).unwrap();
        assert!(factory.feed("open the one"));
        assert!(!factory.feed("again"), "one line per attempt");

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], RecognitionEvent::ReadyForSpeech);
        assert_eq!(
            seen.last(),
            Some(&RecognitionEvent::FinalResult(RecognitionResult::single(
                "open the one"
            )))
        );
    }

    #[test]
    fn test_blank_line_is_no_match() {
        let factory = ConsoleRecognizerFactory::new();
        let (sink, seen) = capture();
        let mut engine = factory.create(sink).unwrap();
        engine.start_listening(&ListenParams::default()).unwrap();
        assert!(factory.feed("   "));
        assert_eq!(
            seen.lock().unwrap().last(),
            Some(&RecognitionEvent::Error(RecognitionErrorKind::NoMatch))
        );
    }

    #[test]
    fn test_destroyed_engine_drops_lines() {
        let factory = ConsoleRecognizerFactory::new();
        let (sink, seen) = capture();
        let mut engine = factory.create(sink).unwrap();
        engine.start_listening(&ListenParams::default()).unwrap();
        engine.destroy();
        assert!(!factory.feed("hello"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
