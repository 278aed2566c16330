//! Exclusive microphone ownership.
//!
//! The background monitor and the foreground session must never record at
//! the same time. Pause/resume signals drive the protocol; the lease here
//! makes the exclusion checkable, so a missed signal leads to a refused
//! start instead of two sessions contending.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Who holds the microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicOwner {
    /// The wake-word monitor.
    Background,
    /// An interactive session in front of the user.
    Foreground,
}

impl std::fmt::Display for MicOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MicOwner::Background => write!(f, "background monitor"),
            MicOwner::Foreground => write!(f, "foreground session"),
        }
    }
}

/// Acquisition refused because someone else holds the microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("microphone is held by the {holder}")]
pub struct MicrophoneBusy {
    pub holder: MicOwner,
}

#[derive(Debug, Clone, Copy)]
struct Holder {
    owner: MicOwner,
    lease_id: u64,
}

/// Hands out at most one [`MicrophoneLease`] at a time.
#[derive(Clone, Default)]
pub struct MicrophoneArbiter {
    slot: Arc<Mutex<Option<Holder>>>,
    next_id: Arc<AtomicU64>,
}

impl MicrophoneArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Holder>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Take the microphone for `owner`, or report who has it.
    pub fn try_acquire(&self, owner: MicOwner) -> Result<MicrophoneLease, MicrophoneBusy> {
        let mut slot = self.lock();
        if let Some(holder) = *slot {
            return Err(MicrophoneBusy {
                holder: holder.owner,
            });
        }

        let lease_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *slot = Some(Holder { owner, lease_id });
        tracing::trace!(%owner, lease_id, "Microphone acquired");

        Ok(MicrophoneLease {
            slot: Arc::clone(&self.slot),
            owner,
            lease_id,
        })
    }

    /// Current holder, if any.
    pub fn holder(&self) -> Option<MicOwner> {
        self.lock().map(|h| h.owner)
    }

    pub fn is_free(&self) -> bool {
        self.lock().is_none()
    }
}

/// Proof of microphone ownership; released on drop.
pub struct MicrophoneLease {
    slot: Arc<Mutex<Option<Holder>>>,
    owner: MicOwner,
    lease_id: u64,
}

impl MicrophoneLease {
    pub fn owner(&self) -> MicOwner {
        self.owner
    }
}

impl std::fmt::Debug for MicrophoneLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicrophoneLease")
            .field("owner", &self.owner)
            .field("lease_id", &self.lease_id)
            .finish()
    }
}

impl Drop for MicrophoneLease {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(*slot, Some(h) if h.lease_id == self.lease_id) {
            *slot = None;
            tracing::trace!(owner = %self.owner, lease_id = self.lease_id, "Microphone released");
        }
    }
}
