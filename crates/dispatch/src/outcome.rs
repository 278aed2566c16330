//! Spoken results of device actions.

use serde::Serialize;

/// How a dispatched action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Done,
    /// A settings screen was opened for the user to finish by hand.
    ManualStepRequired,
    PermissionRequested,
    Unsupported,
    Ambiguous,
    NotFound,
}

/// Message for the user plus what happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub message: String,
    pub kind: OutcomeKind,
}

impl DispatchOutcome {
    pub fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn done(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Done, message)
    }

    pub fn manual(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::ManualStepRequired, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Unsupported, message)
    }

    pub fn is_done(&self) -> bool {
        self.kind == OutcomeKind::Done
    }
}
