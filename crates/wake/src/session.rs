//! Per-service listening session data.

use crate::cooldown::CooldownController;
use crate::microphone::MicrophoneLease;
use crate::status::MonitorState;
use murmur_recognition::ListeningMode;
use std::time::Instant;
use uuid::Uuid;

/// One running recognition attempt.
///
/// Holding the attempt means holding the microphone lease; dropping it
/// releases the microphone.
#[derive(Debug)]
pub(crate) struct Attempt {
    pub id: Uuid,
    pub last_event_at: Instant,
    pub _lease: MicrophoneLease,
}

/// Why the monitor is suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspendReason {
    ChatSession,
    Paused,
}

impl SuspendReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SuspendReason::ChatSession => "Chat session active",
            SuspendReason::Paused => "Temporarily paused",
        }
    }
}

/// State mutated only by the monitor and its cooldown controller.
#[derive(Debug)]
pub struct ListeningSession {
    pub(crate) state: MonitorState,
    pub(crate) mode: ListeningMode,
    pub(crate) cooldown: CooldownController,
    pub(crate) attempt: Option<Attempt>,
    pub(crate) chat_active: bool,
    pub(crate) paused: bool,
    /// Reason shown while suspended; kept through the resume grace delay.
    pub(crate) suspend_reason: Option<SuspendReason>,
}

impl ListeningSession {
    pub(crate) fn new(mode: ListeningMode, cooldown: CooldownController) -> Self {
        Self {
            state: MonitorState::Idle,
            mode,
            cooldown,
            attempt: None,
            chat_active: false,
            paused: false,
            suspend_reason: None,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn mode(&self) -> ListeningMode {
        self.mode
    }

    pub fn consecutive_error_count(&self) -> u32 {
        self.cooldown.consecutive_errors()
    }

    pub fn last_trigger(&self) -> Option<Instant> {
        self.cooldown.last_trigger()
    }

    /// Whether a suspend signal is still in force.
    pub fn is_held_off(&self) -> bool {
        self.chat_active || self.paused
    }

    pub fn has_attempt(&self) -> bool {
        self.attempt.is_some()
    }

    /// Reason currently in force, chat session first.
    pub(crate) fn active_reason(&self) -> Option<SuspendReason> {
        if self.chat_active {
            Some(SuspendReason::ChatSession)
        } else if self.paused {
            Some(SuspendReason::Paused)
        } else {
            None
        }
    }
}
