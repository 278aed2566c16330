//! Background wake-word detection.
//!
//! [`WakeWordMonitor`] is the synchronous state machine; [`WakeWordService`]
//! runs it on a tokio task and hands out [`MonitorHandle`]s for control
//! signals, status queries and foreground microphone sessions.

mod cooldown;
mod error;
mod microphone;
mod monitor;
mod scheduler;
mod service;
mod session;
mod status;
mod wake_lock;

pub use cooldown::{Backoff, CooldownConfig, CooldownController, ErrorBudget, WindowPolicy};
pub use error::{MonitorError, MonitorResult};
pub use microphone::{MicOwner, MicrophoneArbiter, MicrophoneBusy, MicrophoneLease};
pub use monitor::{
    EngineId, MonitorDeps, MonitorEvent, MonitorSettings, SinkFactory, WakeWordMonitor,
};
pub use scheduler::{ManualScheduler, Scheduler, TimerKind, TimerTicket};
pub use service::{ForegroundSession, MonitorHandle, WakeWordService};
pub use session::{ListeningSession, SuspendReason};
pub use status::{MonitorState, MonitorStatus};
pub use wake_lock::{TimedWakeLock, WakeLock};
