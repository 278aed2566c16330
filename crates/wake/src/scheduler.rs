//! Timer plumbing for the monitor.
//!
//! The monitor owns a single pending-timer slot tagged with a ticket. A
//! scheduler only has to deliver the ticket back after the delay; whether
//! the fire still matters is decided by the monitor comparing tickets.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerTicket(pub u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Start listening again.
    Restart,
    /// Destroy and recreate the engine, then listen.
    Recreate,
    /// Leave suspension after the grace delay.
    Resume,
}

/// Delivers ticket fires back to the monitor's serialized context.
pub trait Scheduler: Send {
    /// Fire `ticket` after `delay`.
    fn schedule(&mut self, ticket: TimerTicket, delay: Duration);

    /// Drop every timer that has not fired yet.
    fn cancel_all(&mut self);
}

#[derive(Debug, Default)]
struct ManualState {
    pending: Option<(TimerTicket, Duration)>,
    history: Vec<(TimerTicket, Duration)>,
    cancellations: u32,
}

/// Scheduler driven by hand; nothing fires unless the caller does it.
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The live timer, if any.
    pub fn pending(&self) -> Option<(TimerTicket, Duration)> {
        self.lock().pending
    }

    /// Take the live timer so the caller can fire it.
    pub fn take_pending(&self) -> Option<(TimerTicket, Duration)> {
        self.lock().pending.take()
    }

    /// Every timer ever scheduled, oldest first.
    pub fn history(&self) -> Vec<(TimerTicket, Duration)> {
        self.lock().history.clone()
    }

    pub fn cancellations(&self) -> u32 {
        self.lock().cancellations
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, ticket: TimerTicket, delay: Duration) {
        let mut state = self.lock();
        state.pending = Some((ticket, delay));
        state.history.push((ticket, delay));
    }

    fn cancel_all(&mut self) {
        let mut state = self.lock();
        state.pending = None;
        state.cancellations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_replaces_and_cancels() {
        let observer = ManualScheduler::new();
        let mut scheduler = observer.clone();

        scheduler.schedule(TimerTicket(1), Duration::from_secs(1));
        scheduler.schedule(TimerTicket(2), Duration::from_secs(2));
        assert_eq!(observer.pending(), Some((TimerTicket(2), Duration::from_secs(2))));

        scheduler.cancel_all();
        assert_eq!(observer.pending(), None);
        assert_eq!(observer.history().len(), 2);
        assert_eq!(observer.cancellations(), 1);
    }
}
