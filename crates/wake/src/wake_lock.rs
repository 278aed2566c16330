//! Keep-awake resource held while the monitor runs.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Platform keep-awake handle.
///
/// Acquired with a timeout so a crashed owner cannot pin the device awake
/// forever; the monitor renews it on every health tick.
pub trait WakeLock: Send {
    fn acquire(&mut self, timeout: Duration, now: Instant);

    fn is_held(&self, now: Instant) -> bool;

    fn release(&mut self);
}

#[derive(Debug, Default)]
struct LockState {
    expires_at: Option<Instant>,
    acquisitions: u32,
    releases: u32,
}

/// In-process wake lock that expires after its timeout.
///
/// Clones share state, so a test can keep a handle while the monitor owns
/// the boxed lock.
#[derive(Debug, Clone, Default)]
pub struct TimedWakeLock {
    state: Arc<Mutex<LockState>>,
}

impl TimedWakeLock {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn acquisitions(&self) -> u32 {
        self.lock().acquisitions
    }

    pub fn releases(&self) -> u32 {
        self.lock().releases
    }
}

impl WakeLock for TimedWakeLock {
    fn acquire(&mut self, timeout: Duration, now: Instant) {
        let mut state = self.lock();
        state.expires_at = Some(now + timeout);
        state.acquisitions += 1;
        tracing::debug!(timeout_secs = timeout.as_secs(), "Wake lock acquired");
    }

    fn is_held(&self, now: Instant) -> bool {
        self.lock().expires_at.map(|t| now < t).unwrap_or(false)
    }

    fn release(&mut self) {
        let mut state = self.lock();
        if state.expires_at.take().is_some() {
            state.releases += 1;
            tracing::debug!("Wake lock released");
        }
    }
}
