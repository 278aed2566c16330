//! Detection cooldown and error budget.
//!
//! Pure bookkeeping: callers pass `now` in, so every decision here is
//! deterministic and testable without a clock.

use murmur_config::TimingConfig;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How serious errors age out of the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPolicy {
    /// Errors accumulate until the next successful ready callback.
    #[default]
    Consecutive,
    /// Errors older than the window are forgotten as well.
    Sliding(Duration),
}

/// Count of serious recognition errors against a threshold.
#[derive(Debug, Clone)]
pub struct ErrorBudget {
    errors: VecDeque<Instant>,
    threshold: u32,
    window: WindowPolicy,
}

impl ErrorBudget {
    pub fn new(threshold: u32, window: WindowPolicy) -> Self {
        Self {
            errors: VecDeque::new(),
            threshold: threshold.max(1),
            window,
        }
    }

    pub fn count(&self) -> u32 {
        self.errors.len() as u32
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn is_exhausted(&self) -> bool {
        self.count() >= self.threshold
    }

    /// Record one serious error and return the new count.
    pub fn record(&mut self, now: Instant) -> u32 {
        if let WindowPolicy::Sliding(window) = self.window {
            while let Some(&oldest) = self.errors.front() {
                if now.saturating_duration_since(oldest) > window {
                    self.errors.pop_front();
                } else {
                    break;
                }
            }
        }
        self.errors.push_back(now);
        self.count()
    }

    pub fn reset(&mut self) {
        self.errors.clear();
    }
}

/// What to do after an attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Start listening again after the delay.
    Restart(Duration),
    /// Destroy the engine, wait, then create a fresh one.
    Recreate(Duration),
}

impl Backoff {
    pub fn delay(&self) -> Duration {
        match self {
            Backoff::Restart(d) | Backoff::Recreate(d) => *d,
        }
    }
}

/// Cooldown tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownConfig {
    /// Minimum spacing between two accepted detections.
    pub detection_cooldown: Duration,
    /// Base delay before listening again.
    pub restart_delay: Duration,
    /// Delay before recreating a wedged engine.
    pub long_cooldown: Duration,
    pub error_threshold: u32,
    pub window: WindowPolicy,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self::from(&TimingConfig::default())
    }
}

impl From<&TimingConfig> for CooldownConfig {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            detection_cooldown: timing.detection_cooldown(),
            restart_delay: timing.restart_delay(),
            long_cooldown: timing.long_cooldown(),
            error_threshold: timing.error_threshold,
            window: WindowPolicy::Consecutive,
        }
    }
}

/// Tracks the last trigger and the error budget; decides restart delays.
#[derive(Debug, Clone)]
pub struct CooldownController {
    config: CooldownConfig,
    budget: ErrorBudget,
    last_trigger: Option<Instant>,
}

impl CooldownController {
    pub fn new(config: CooldownConfig) -> Self {
        let budget = ErrorBudget::new(config.error_threshold, config.window);
        Self {
            config,
            budget,
            last_trigger: None,
        }
    }

    pub fn config(&self) -> &CooldownConfig {
        &self.config
    }

    pub fn last_trigger(&self) -> Option<Instant> {
        self.last_trigger
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.budget.count()
    }

    /// Accept a detection at `now` unless one was accepted within the cooldown.
    pub fn try_trigger(&mut self, now: Instant) -> bool {
        let allowed = match self.last_trigger {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.config.detection_cooldown,
        };
        if allowed {
            self.last_trigger = Some(now);
        }
        allowed
    }

    /// Engine reported ready for speech.
    pub fn on_ready(&mut self) {
        if self.budget.count() > 0 {
            tracing::debug!(
                errors = self.budget.count(),
                "Recognizer ready, resetting error budget"
            );
        }
        self.budget.reset();
    }

    /// Restart delay scaled by the current error count.
    pub fn restart_delay(&self) -> Duration {
        match self.budget.count() {
            0 => self.config.restart_delay,
            n => self.config.restart_delay.saturating_mul(n),
        }
    }

    /// No match or benign error; the budget is untouched.
    pub fn record_benign(&self) -> Backoff {
        Backoff::Restart(self.restart_delay())
    }

    /// Serious error; escalates to recreation once the budget is exhausted.
    pub fn record_serious(&mut self, now: Instant) -> Backoff {
        let count = self.budget.record(now);
        if self.budget.is_exhausted() {
            tracing::warn!(
                errors = count,
                threshold = self.budget.threshold(),
                "Error budget exhausted, recreating recognizer after long cooldown"
            );
            Backoff::Recreate(self.config.long_cooldown)
        } else {
            Backoff::Restart(self.restart_delay())
        }
    }
}
