//! Wake-word service tests on a paused tokio clock.

use murmur_config::AssistantConfig;
use murmur_events::{event_names, InMemoryEventBus};
use murmur_recognition::fake::{FakeCall, ScriptedRecognizerFactory};
use murmur_recognition::{RecognitionEvent, RecognitionResult};
use murmur_wake::{
    MicOwner, MicrophoneArbiter, MonitorDeps, MonitorError, MonitorSettings, MonitorState,
    TimedWakeLock, WakeWordService,
};
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    engine: ScriptedRecognizerFactory,
    bus: Arc<InMemoryEventBus>,
    mic: MicrophoneArbiter,
    lock: TimedWakeLock,
}

impl Fixture {
    fn new(engine: ScriptedRecognizerFactory) -> Self {
        Self {
            engine,
            bus: Arc::new(InMemoryEventBus::new()),
            mic: MicrophoneArbiter::new(),
            lock: TimedWakeLock::new(),
        }
    }

    fn deps(&self) -> MonitorDeps {
        MonitorDeps {
            factory: Arc::new(self.engine.clone()),
            bus: self.bus.clone(),
            microphone: self.mic.clone(),
            wake_lock: Box::new(self.lock.clone()),
        }
    }

    fn spawn(&self) -> WakeWordService {
        WakeWordService::spawn_with(MonitorSettings::default(), self.deps()).unwrap()
    }
}

/// Let the actor drain its queue.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

// ============================================================================
// Lifecycle
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_spawn_starts_listening() {
        let fx = Fixture::new(ScriptedRecognizerFactory::new());
        let service = fx.spawn();

        assert!(fx.engine.is_listening());
        assert_eq!(service.status().state, MonitorState::Listening);
        assert_eq!(service.status().text, "Listening for 'open the one'");
        assert_eq!(fx.lock.acquisitions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_config_does_not_spawn() {
        let fx = Fixture::new(ScriptedRecognizerFactory::new());
        let config = AssistantConfig {
            wake_word_enabled: false,
            ..Default::default()
        };

        let service = WakeWordService::spawn(&config, fx.deps()).unwrap();
        assert!(service.is_none());
        assert!(fx.engine.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_engine_fails_spawn() {
        let fx = Fixture::new(ScriptedRecognizerFactory::unavailable());

        let result = WakeWordService::spawn_with(MonitorSettings::default(), fx.deps());
        assert!(matches!(result, Err(MonitorError::RecognitionUnavailable)));
        assert_eq!(fx.bus.events_for(event_names::VOICE_ERROR).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_releases_engine() {
        let fx = Fixture::new(ScriptedRecognizerFactory::new());
        let service = fx.spawn();
        let handle = service.handle();

        service.shutdown().await;

        assert_eq!(fx.engine.count(FakeCall::Destroy), 1);
        assert!(fx.mic.is_free());
        assert_eq!(fx.lock.releases(), 1);
        assert_eq!(handle.status().state, MonitorState::Stopped);
        assert!(matches!(
            handle.pause().await,
            Err(MonitorError::NotRunning)
        ));
    }
}

// ============================================================================
// Detection loop
// ============================================================================

mod detection {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_detection_then_restart() {
        let fx = Fixture::new(ScriptedRecognizerFactory::new());
        let service = fx.spawn();

        fx.engine.emit(RecognitionEvent::ReadyForSpeech);
        fx.engine.emit(RecognitionEvent::FinalResult(RecognitionResult::single(
            "hey open the one",
        )));
        settle().await;

        assert_eq!(fx.bus.events_for(event_names::WAKE_WORD_DETECTED).len(), 1);
        assert_eq!(service.status().text, "Wake word detected");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fx.engine.count(FakeCall::Start), 2);
        assert_eq!(service.status().state, MonitorState::Listening);
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_tick_restarts_silent_attempt() {
        let fx = Fixture::new(ScriptedRecognizerFactory::new());
        let _service = fx.spawn();

        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(fx.engine.count(FakeCall::Stop), 1);
        assert_eq!(fx.engine.count(FakeCall::Start), 2);
        assert_eq!(fx.engine.overlapping_starts(), 0);
        assert_eq!(fx.lock.acquisitions(), 2);
    }
}

// ============================================================================
// Foreground sessions and pause
// ============================================================================

mod suspension {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_chat_session_takes_microphone() {
        let fx = Fixture::new(ScriptedRecognizerFactory::new());
        let service = fx.spawn();
        let handle = service.handle();

        let session = handle.open_chat_session().await.unwrap();
        assert!(!fx.engine.is_listening());
        assert_eq!(fx.mic.holder(), Some(MicOwner::Foreground));
        assert_eq!(handle.status().state, MonitorState::Suspended);
        assert_eq!(handle.status().text, "Paused: Chat session active");

        session.close();
        settle().await;
        assert_eq!(fx.mic.holder(), None);
        assert_eq!(handle.status().state, MonitorState::Suspended);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(fx.engine.is_listening());
        assert_eq!(fx.mic.holder(), Some(MicOwner::Background));
        assert_eq!(fx.engine.overlapping_starts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_resume() {
        let fx = Fixture::new(ScriptedRecognizerFactory::new());
        let service = fx.spawn();
        let handle = service.handle();
        let mut status = handle.watch_status();

        handle.pause().await.unwrap();
        assert!(status.has_changed().unwrap());
        assert_eq!(status.borrow_and_update().text, "Paused: Temporarily paused");

        // Nothing restarts while paused, not even the health tick.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(fx.engine.count(FakeCall::Start), 1);

        handle.resume().await.unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fx.engine.count(FakeCall::Start), 2);
        assert!(handle.status().is_listening());
    }
}
