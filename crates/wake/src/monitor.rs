//! Wake-word monitor state machine.
//!
//! All engine callbacks, control signals, timer fires and health ticks are
//! delivered to [`WakeWordMonitor::handle`] from one serialized context, so
//! the monitor needs no locking of its own. The monitor never sleeps or
//! blocks: it reacts to an event and, when it wants to be woken later,
//! schedules a ticket.
//!
//! ```text
//!            start / timer
//!   Idle ───────────────────► Listening ──► (Processing) ──► final / error
//!    ▲                          │    │                            │
//!    │                 partial/final  ChatSessionOpened            ▼
//!    │                 + phrase       PauseListening          CoolingDown
//!    │                     │            │                         │
//!    │                     ▼            ▼                         │
//!    └──── grace timer ◄── Suspended ◄──┘      restart/recreate ◄─┘
//! ```

use crate::cooldown::{Backoff, CooldownConfig, CooldownController};
use crate::microphone::{MicOwner, MicrophoneArbiter};
use crate::scheduler::{Scheduler, TimerKind, TimerTicket};
use crate::session::{Attempt, ListeningSession, SuspendReason};
use crate::status::{self, MonitorState, MonitorStatus};
use crate::wake_lock::WakeLock;
use crate::{MonitorError, MonitorResult};
use murmur_config::AssistantConfig;
use murmur_events::{
    emit_typed, event_names, ControlSignal, EventBusRef, MonitorStatusChangedEvent,
    VoiceErrorEvent, VoiceResultEvent, WakeWordDetectedEvent,
};
use murmur_recognition::{
    ErrorSeverity, ListenParams, ListeningMode, RecognitionError, RecognitionErrorKind,
    RecognitionEvent, RecognitionResult, RecognitionSink, RecognizerFactory, SpeechRecognizer,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Generation number of an engine instance. Bumped on every create.
pub type EngineId = u64;

/// Builds the callback sink for a freshly created engine.
///
/// The sink must tag events with the given id and forward them to the
/// monitor's serialized context.
pub type SinkFactory = Arc<dyn Fn(EngineId) -> RecognitionSink + Send + Sync>;

/// Everything the monitor reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    Recognition {
        engine: EngineId,
        event: RecognitionEvent,
    },
    Control(ControlSignal),
    TimerFired(TimerTicket),
    HealthCheck,
}

/// Monitor tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub wake_phrase: String,
    pub mode: ListeningMode,
    pub cooldown: CooldownConfig,
    /// Delay between a resume signal and listening again.
    pub resume_grace: Duration,
    pub health_check_interval: Duration,
    pub wake_lock_timeout: Duration,
}

impl MonitorSettings {
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self {
            wake_phrase: config.wake_phrase.trim().to_lowercase(),
            mode: config.listening_mode,
            cooldown: CooldownConfig::from(&config.timing),
            resume_grace: config.timing.resume_grace(),
            health_check_interval: config.timing.health_check_interval(),
            wake_lock_timeout: config.timing.wake_lock_timeout(),
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}

/// External collaborators of the monitor.
pub struct MonitorDeps {
    pub factory: Arc<dyn RecognizerFactory>,
    pub bus: EventBusRef,
    pub microphone: MicrophoneArbiter,
    pub wake_lock: Box<dyn WakeLock>,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    ticket: TimerTicket,
    kind: TimerKind,
    due: Instant,
}

/// Transient status overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    Detected,
    WaitingForMic,
}

/// Drives one speech engine in a loop and watches transcripts for the wake
/// phrase.
pub struct WakeWordMonitor {
    settings: MonitorSettings,
    factory: Arc<dyn RecognizerFactory>,
    bus: EventBusRef,
    microphone: MicrophoneArbiter,
    wake_lock: Box<dyn WakeLock>,
    scheduler: Box<dyn Scheduler>,
    sinks: SinkFactory,
    session: ListeningSession,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    engine_id: EngineId,
    pending: Option<PendingTimer>,
    next_ticket: u64,
    notice: Option<Notice>,
    started: bool,
    unavailable: bool,
    status: MonitorStatus,
}

impl WakeWordMonitor {
    pub fn new(
        settings: MonitorSettings,
        deps: MonitorDeps,
        scheduler: Box<dyn Scheduler>,
        sinks: SinkFactory,
    ) -> Self {
        let session = ListeningSession::new(
            settings.mode,
            CooldownController::new(settings.cooldown.clone()),
        );
        let status = MonitorStatus {
            state: MonitorState::Idle,
            text: status::STARTING_TEXT.to_string(),
            consecutive_errors: 0,
            mode: settings.mode,
            wake_phrase: settings.wake_phrase.clone(),
        };

        Self {
            settings,
            factory: deps.factory,
            bus: deps.bus,
            microphone: deps.microphone,
            wake_lock: deps.wake_lock,
            scheduler,
            sinks,
            session,
            recognizer: None,
            engine_id: 0,
            pending: None,
            next_ticket: 0,
            notice: None,
            started: false,
            unavailable: false,
            status,
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn session(&self) -> &ListeningSession {
        &self.session
    }

    pub fn state(&self) -> MonitorState {
        self.session.state
    }

    pub fn status(&self) -> &MonitorStatus {
        &self.status
    }

    /// Generation of the current engine instance.
    pub fn engine_id(&self) -> EngineId {
        self.engine_id
    }

    /// Kind of the live timer, if any.
    pub fn pending_timer(&self) -> Option<TimerKind> {
        self.pending.map(|p| p.kind)
    }

    /// Start the monitor.
    ///
    /// Fails with [`MonitorError::RecognitionUnavailable`] when the device
    /// has no speech recognition; the failure is reported once on the bus
    /// and the monitor stays stopped.
    pub fn start(&mut self, now: Instant) -> MonitorResult<()> {
        if self.started {
            return Err(MonitorError::AlreadyStarted);
        }
        if self.session.state == MonitorState::Stopped {
            return Err(MonitorError::NotRunning);
        }
        self.started = true;

        if !self.factory.is_available() {
            tracing::error!(
                factory = self.factory.name(),
                "Speech recognition not available, monitor will not run"
            );
            self.unavailable = true;
            self.session.state = MonitorState::Stopped;
            self.emit_error(RecognitionErrorKind::Unavailable);
            self.publish_status();
            return Err(MonitorError::RecognitionUnavailable);
        }

        self.wake_lock.acquire(self.settings.wake_lock_timeout, now);
        tracing::info!(
            phrase = %self.settings.wake_phrase,
            mode = %self.settings.mode,
            factory = self.factory.name(),
            "Starting wake word monitor"
        );

        self.begin_listening(now);
        self.publish_status();
        Ok(())
    }

    /// Tear down: cancel timers, stop and destroy the engine, release the
    /// wake lock. Idempotent.
    pub fn shutdown(&mut self) {
        if self.session.state == MonitorState::Stopped {
            return;
        }

        self.cancel_timers();
        self.end_attempt(true);
        if let Some(mut recognizer) = self.recognizer.take() {
            recognizer.destroy();
        }
        self.wake_lock.release();
        self.notice = None;
        self.session.state = MonitorState::Stopped;

        tracing::info!("Wake word monitor stopped");
        self.publish_status();
    }

    /// React to one event.
    pub fn handle(&mut self, event: MonitorEvent, now: Instant) {
        if !self.started || self.session.state == MonitorState::Stopped {
            tracing::trace!(?event, "Monitor not running, ignoring event");
            return;
        }

        match event {
            MonitorEvent::Recognition { engine, event } => {
                if engine != self.engine_id || self.recognizer.is_none() {
                    tracing::debug!(
                        engine,
                        current = self.engine_id,
                        event = event.name(),
                        "Ignoring event from stale recognizer"
                    );
                } else {
                    self.on_recognition(event, now);
                }
            }
            MonitorEvent::Control(signal) => self.on_control(signal, now),
            MonitorEvent::TimerFired(ticket) => self.on_timer(ticket, now),
            MonitorEvent::HealthCheck => self.on_health_check(now),
        }

        self.publish_status();
    }

    fn on_recognition(&mut self, event: RecognitionEvent, now: Instant) {
        let Some(attempt) = self.session.attempt.as_mut() else {
            tracing::debug!(event = event.name(), "No active attempt, ignoring recognizer event");
            return;
        };
        attempt.last_event_at = now;
        let attempt_id = attempt.id;

        match event {
            RecognitionEvent::ReadyForSpeech => {
                self.session.cooldown.on_ready();
                self.session.state = MonitorState::Listening;
                tracing::debug!(attempt = %attempt_id, "Ready for wake word detection");
            }
            RecognitionEvent::BeginningOfSpeech => {
                tracing::trace!(attempt = %attempt_id, "Speech started");
            }
            RecognitionEvent::EndOfSpeech => {
                self.session.state = MonitorState::Processing;
                tracing::trace!(attempt = %attempt_id, "Speech ended");
            }
            RecognitionEvent::PartialResult(result) => {
                if result.best_contains(&self.settings.wake_phrase) && self.try_detect(&result, now)
                {
                    self.end_attempt(true);
                    let delay = self.session.cooldown.restart_delay();
                    self.schedule(TimerKind::Restart, delay, now);
                }
            }
            RecognitionEvent::FinalResult(result) => {
                self.end_attempt(false);

                if let Some(text) = result.best().filter(|t| !t.trim().is_empty()) {
                    tracing::debug!(attempt = %attempt_id, transcript = %text, "Speech recognized");
                    emit_typed(
                        &*self.bus,
                        event_names::VOICE_RESULT,
                        &VoiceResultEvent {
                            text: text.to_string(),
                        },
                    );
                }

                if !(result.best_contains(&self.settings.wake_phrase)
                    && self.try_detect(&result, now))
                {
                    tracing::trace!(attempt = %attempt_id, "No wake phrase in result");
                }
                let backoff = self.session.cooldown.record_benign();
                self.apply_backoff(backoff, now);
            }
            RecognitionEvent::Error(kind) => {
                self.end_attempt(false);
                self.on_error(kind, now);
            }
        }
    }

    /// Accept a detection unless it falls inside the cooldown window.
    fn try_detect(&mut self, result: &RecognitionResult, now: Instant) -> bool {
        if !self.session.cooldown.try_trigger(now) {
            tracing::debug!("Wake word detected but in cooldown period");
            return false;
        }

        let transcript = result.best().unwrap_or_default().to_string();
        tracing::info!(
            phrase = %self.settings.wake_phrase,
            transcript = %transcript,
            "Wake word detected"
        );
        self.notice = Some(Notice::Detected);
        emit_typed(
            &*self.bus,
            event_names::WAKE_WORD_DETECTED,
            &WakeWordDetectedEvent {
                phrase: self.settings.wake_phrase.clone(),
                transcript,
                ts_ms: murmur_events::now_ms(),
            },
        );
        true
    }

    fn on_error(&mut self, kind: RecognitionErrorKind, now: Instant) {
        match kind.severity() {
            ErrorSeverity::Benign => {
                tracing::debug!(error = %kind, "Minor speech recognition error");
                let backoff = self.session.cooldown.record_benign();
                self.apply_backoff(backoff, now);
            }
            // Unavailability is only fatal at startup; mid-run it is one more
            // serious error and the budget decides.
            ErrorSeverity::Serious | ErrorSeverity::Fatal => {
                let backoff = self.session.cooldown.record_serious(now);
                tracing::warn!(
                    error = %kind,
                    count = self.session.cooldown.consecutive_errors(),
                    "Serious speech recognition error"
                );
                self.emit_error(kind);
                self.apply_backoff(backoff, now);
            }
        }
    }

    fn on_control(&mut self, signal: ControlSignal, now: Instant) {
        tracing::debug!(?signal, state = %self.session.state, "Control signal");
        match signal {
            ControlSignal::ChatSessionOpened => {
                self.session.chat_active = true;
                self.suspend(SuspendReason::ChatSession);
            }
            ControlSignal::PauseListening => {
                self.session.paused = true;
                self.suspend(SuspendReason::Paused);
            }
            ControlSignal::ChatSessionClosed => {
                self.session.chat_active = false;
                self.schedule_resume(now);
            }
            ControlSignal::ResumeListening => {
                self.session.paused = false;
                self.schedule_resume(now);
            }
        }
    }

    /// Stop everything before returning; the foreground may take the
    /// microphone as soon as this handler completes.
    fn suspend(&mut self, reason: SuspendReason) {
        self.cancel_timers();
        self.end_attempt(true);
        self.notice = None;

        if self.session.state != MonitorState::Suspended {
            tracing::info!(reason = reason.describe(), "Wake word detection suspended");
        }
        self.session.suspend_reason = self.session.active_reason().or(Some(reason));
        self.session.state = MonitorState::Suspended;
    }

    fn schedule_resume(&mut self, now: Instant) {
        if self.session.state != MonitorState::Suspended {
            tracing::debug!(state = %self.session.state, "Resume ignored, not suspended");
            return;
        }
        if let Some(reason) = self.session.active_reason() {
            tracing::debug!(reason = reason.describe(), "Still suspended");
            self.session.suspend_reason = Some(reason);
            return;
        }
        self.schedule(TimerKind::Resume, self.settings.resume_grace, now);
    }

    fn on_timer(&mut self, ticket: TimerTicket, now: Instant) {
        let Some(pending) = self.pending.filter(|p| p.ticket == ticket) else {
            tracing::debug!(ticket = ticket.0, "Ignoring stale timer");
            return;
        };
        self.pending = None;

        match pending.kind {
            TimerKind::Restart => self.begin_listening(now),
            TimerKind::Recreate => {
                self.destroy_recognizer();
                self.begin_listening(now);
            }
            TimerKind::Resume => {
                if self.session.is_held_off() {
                    return;
                }
                tracing::info!("Resuming wake word detection");
                self.session.suspend_reason = None;
                self.session.state = MonitorState::Idle;
                self.begin_listening(now);
            }
        }
    }

    /// Watchdog for the callback-driven loop.
    fn on_health_check(&mut self, now: Instant) {
        if !self.wake_lock.is_held(now) {
            tracing::warn!("Wake lock lapsed");
        }
        self.wake_lock.acquire(self.settings.wake_lock_timeout, now);

        if self.session.state == MonitorState::Suspended {
            return;
        }

        if let Some(attempt) = &self.session.attempt {
            let silent_for = now.saturating_duration_since(attempt.last_event_at);
            if silent_for >= self.settings.health_check_interval {
                tracing::warn!(
                    attempt = %attempt.id,
                    silent_secs = silent_for.as_secs(),
                    "Recognition attempt unresponsive, restarting"
                );
                self.end_attempt(true);
                self.begin_listening(now);
            }
            return;
        }

        let timer_lost = self
            .pending
            .map(|p| now >= p.due + self.settings.health_check_interval)
            .unwrap_or(true);
        if timer_lost {
            tracing::info!(state = %self.session.state, "Health check: restarting listening");
            self.pending = None;
            self.begin_listening(now);
        }
    }

    fn begin_listening(&mut self, now: Instant) {
        if self.session.state == MonitorState::Stopped {
            return;
        }
        if self.session.is_held_off() {
            tracing::debug!("Not starting listening while suspended");
            return;
        }
        if self.session.attempt.is_some() {
            tracing::debug!("Recognition attempt already running");
            return;
        }
        self.notice = None;

        let lease = match self.microphone.try_acquire(MicOwner::Background) {
            Ok(lease) => lease,
            Err(busy) => {
                tracing::warn!(holder = %busy.holder, "Microphone busy, not starting");
                let delay = self.session.cooldown.restart_delay();
                self.schedule(TimerKind::Restart, delay, now);
                self.notice = Some(Notice::WaitingForMic);
                return;
            }
        };

        let params = ListenParams::for_mode(self.session.mode);
        let started = match self.ensure_recognizer() {
            Ok(recognizer) => recognizer.start_listening(&params),
            Err(e) => Err(e),
        };

        match started {
            Ok(()) => {
                let id = Uuid::new_v4();
                self.session.attempt = Some(Attempt {
                    id,
                    last_event_at: now,
                    _lease: lease,
                });
                self.session.state = MonitorState::Listening;
                tracing::debug!(
                    attempt = %id,
                    engine = self.engine_id,
                    mode = %self.session.mode,
                    "Started listening for wake word"
                );
            }
            Err(e) => {
                drop(lease);
                tracing::warn!(error = %e, "Failed to start speech recognition");
                self.on_error(e.kind(), now);
            }
        }
    }

    fn ensure_recognizer(&mut self) -> Result<&mut Box<dyn SpeechRecognizer>, RecognitionError> {
        if self.recognizer.is_none() {
            let engine_id = self.engine_id + 1;
            let recognizer = self.factory.create((self.sinks)(engine_id))?;
            self.engine_id = engine_id;
            self.recognizer = Some(recognizer);
            tracing::info!(engine = engine_id, "Speech recognizer created");
        }
        self.recognizer.as_mut().ok_or(RecognitionError::Destroyed)
    }

    fn destroy_recognizer(&mut self) {
        self.end_attempt(true);
        if let Some(mut recognizer) = self.recognizer.take() {
            recognizer.destroy();
            tracing::info!(engine = self.engine_id, "Speech recognizer destroyed");
        }
    }

    /// Close the running attempt, releasing the microphone.
    ///
    /// `stop` is false when the engine already ended the attempt itself.
    fn end_attempt(&mut self, stop: bool) {
        let Some(attempt) = self.session.attempt.take() else {
            return;
        };
        if stop {
            if let Some(recognizer) = self.recognizer.as_mut() {
                recognizer.stop_listening();
            }
        }
        tracing::trace!(attempt = %attempt.id, stopped = stop, "Recognition attempt ended");
        if self.session.state != MonitorState::Suspended {
            self.session.state = MonitorState::Idle;
        }
    }

    fn apply_backoff(&mut self, backoff: Backoff, now: Instant) {
        match backoff {
            Backoff::Restart(delay) => self.schedule(TimerKind::Restart, delay, now),
            Backoff::Recreate(delay) => self.schedule(TimerKind::Recreate, delay, now),
        }
    }

    /// Replace the single pending timer.
    fn schedule(&mut self, kind: TimerKind, delay: Duration, now: Instant) {
        self.scheduler.cancel_all();
        self.next_ticket += 1;
        let ticket = TimerTicket(self.next_ticket);
        self.pending = Some(PendingTimer {
            ticket,
            kind,
            due: now + delay,
        });
        self.scheduler.schedule(ticket, delay);
        if kind != TimerKind::Resume {
            self.session.state = MonitorState::CoolingDown;
        }
        tracing::debug!(
            ?kind,
            ticket = ticket.0,
            delay_ms = delay.as_millis() as u64,
            "Timer scheduled"
        );
    }

    fn cancel_timers(&mut self) {
        if self.pending.take().is_some() {
            tracing::trace!("Pending timer cancelled");
        }
        self.scheduler.cancel_all();
    }

    fn emit_error(&self, kind: RecognitionErrorKind) {
        emit_typed(
            &*self.bus,
            event_names::VOICE_ERROR,
            &VoiceErrorEvent {
                message: kind.message(),
            },
        );
    }

    fn compute_status(&self) -> MonitorStatus {
        let text = match self.session.state {
            MonitorState::Stopped if self.unavailable => status::UNAVAILABLE_TEXT.to_string(),
            MonitorState::Stopped => status::STOPPED_TEXT.to_string(),
            MonitorState::Suspended => status::paused_text(
                self.session
                    .suspend_reason
                    .unwrap_or(SuspendReason::Paused)
                    .describe(),
            ),
            _ if self.notice == Some(Notice::WaitingForMic) => {
                status::WAITING_FOR_MIC_TEXT.to_string()
            }
            _ if self.notice == Some(Notice::Detected) => status::DETECTED_TEXT.to_string(),
            MonitorState::CoolingDown if self.pending_timer() == Some(TimerKind::Recreate) => {
                status::COOLING_DOWN_TEXT.to_string()
            }
            MonitorState::Idle if !self.started => status::STARTING_TEXT.to_string(),
            _ => status::listening_text(&self.settings.wake_phrase),
        };

        MonitorStatus {
            state: self.session.state,
            text,
            consecutive_errors: self.session.consecutive_error_count(),
            mode: self.session.mode,
            wake_phrase: self.settings.wake_phrase.clone(),
        }
    }

    fn publish_status(&mut self) {
        let next = self.compute_status();
        if next == self.status {
            return;
        }
        if next.state != self.status.state || next.text != self.status.text {
            tracing::debug!(state = %next.state, text = %next.text, "Monitor status changed");
            emit_typed(
                &*self.bus,
                event_names::MONITOR_STATUS_CHANGED,
                &MonitorStatusChangedEvent {
                    state: next.state.to_string(),
                    text: next.text.clone(),
                },
            );
        }
        self.status = next;
    }
}

impl Drop for WakeWordMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
