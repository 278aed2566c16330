//! Scripted engine for tests and headless runs.
//!
//! The factory handle is cheap to clone: tests keep one copy to push events
//! and inspect lifecycle calls while the monitor owns the other.

use crate::{
    ListenParams, RecognitionError, RecognitionErrorKind, RecognitionEvent, RecognitionSink,
    RecognizerFactory, SpeechRecognizer,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Lifecycle call recorded by the fake engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Create,
    Start,
    Stop,
    Destroy,
}

#[derive(Default)]
struct FakeState {
    unavailable: bool,
    fail_create: u32,
    fail_start: VecDeque<RecognitionErrorKind>,
    sink: Option<RecognitionSink>,
    listening: bool,
    overlapping_starts: u32,
    last_params: Option<ListenParams>,
    calls: Vec<FakeCall>,
}

/// Factory producing [`ScriptedRecognizer`] instances sharing one script.
#[derive(Clone, Default)]
pub struct ScriptedRecognizerFactory {
    state: Arc<Mutex<FakeState>>,
}

impl ScriptedRecognizerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory reporting that recognition does not exist on the device.
    pub fn unavailable() -> Self {
        let factory = Self::new();
        factory.lock().unavailable = true;
        factory
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the next `count` calls to `create` fail.
    pub fn fail_next_create(&self, count: u32) {
        self.lock().fail_create = count;
    }

    /// Make the next `start_listening` fail with `kind`.
    pub fn fail_next_start(&self, kind: RecognitionErrorKind) {
        self.lock().fail_start.push_back(kind);
    }

    /// Deliver an event through the most recently created engine's sink.
    ///
    /// Returns false when no engine has been created yet.
    pub fn emit(&self, event: RecognitionEvent) -> bool {
        let sink = self.lock().sink.clone();
        match sink {
            Some(sink) => {
                if event.ends_attempt() {
                    self.lock().listening = false;
                }
                sink(event);
                true
            }
            None => false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.lock().listening
    }

    /// Number of starts issued while an attempt was still running.
    pub fn overlapping_starts(&self) -> u32 {
        self.lock().overlapping_starts
    }

    pub fn last_params(&self) -> Option<ListenParams> {
        self.lock().last_params.clone()
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.lock().calls.clone()
    }

    pub fn count(&self, call: FakeCall) -> usize {
        self.lock().calls.iter().filter(|c| **c == call).count()
    }
}

impl RecognizerFactory for ScriptedRecognizerFactory {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        !self.lock().unavailable
    }

    fn create(&self, sink: RecognitionSink) -> crate::Result<Box<dyn SpeechRecognizer>> {
        let mut state = self.lock();
        if state.unavailable {
            return Err(RecognitionError::Unavailable);
        }
        state.calls.push(FakeCall::Create);
        if state.fail_create > 0 {
            state.fail_create -= 1;
            return Err(RecognitionError::CreateFailed("scripted failure".to_string()));
        }
        state.sink = Some(sink);
        state.listening = false;

        Ok(Box::new(ScriptedRecognizer {
            state: Arc::clone(&self.state),
            destroyed: false,
        }))
    }
}

/// Engine instance created by [`ScriptedRecognizerFactory`].
pub struct ScriptedRecognizer {
    state: Arc<Mutex<FakeState>>,
    destroyed: bool,
}

impl ScriptedRecognizer {
    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start_listening(&mut self, params: &ListenParams) -> crate::Result<()> {
        if self.destroyed {
            return Err(RecognitionError::Destroyed);
        }
        let mut state = self.lock();
        state.calls.push(FakeCall::Start);
        if let Some(kind) = state.fail_start.pop_front() {
            return Err(RecognitionError::StartFailed(kind));
        }
        if state.listening {
            state.overlapping_starts += 1;
        }
        state.listening = true;
        state.last_params = Some(params.clone());
        Ok(())
    }

    fn stop_listening(&mut self) {
        let mut state = self.lock();
        state.calls.push(FakeCall::Stop);
        state.listening = false;
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let mut state = self.lock();
        state.calls.push(FakeCall::Destroy);
        state.listening = false;
        state.sink = None;
    }
}
