use crate::MicrophoneBusy;

/// Result type for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors surfaced by the monitor and its runtime.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// No usable engine on this device; the monitor stays stopped.
    #[error("speech recognition is not available on this device")]
    RecognitionUnavailable,

    #[error("monitor already started")]
    AlreadyStarted,

    /// The monitor task is gone.
    #[error("wake word monitor is not running")]
    NotRunning,

    #[error(transparent)]
    MicrophoneBusy(#[from] MicrophoneBusy),
}
