use thiserror::Error;

use crate::Slot;

/// Result alias used across the crate.
pub type Result<T, E = ForgeError> = std::result::Result<T, E>;

/// Errors returned by forge lookups, extraction and invocation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ForgeError {
    /// A required slot has no registered callable.
    #[error("Closure for {slot} not found")]
    SlotNotFound { slot: Slot },

    /// The callable stored under a slot is not of that slot's kind.
    #[error("Closure for {slot} has the wrong kind: found a {found} handler")]
    HandlerMismatch { slot: Slot, found: Slot },

    /// A string key that names no slot.
    #[error("Unknown slot key: {0}")]
    UnknownSlot(String),

    /// An error raised inside a registered callable.
    #[error(transparent)]
    Callable(#[from] anyhow::Error),
}

impl ForgeError {
    /// The slot this error is about, if any.
    pub fn slot(&self) -> Option<Slot> {
        match self {
            ForgeError::SlotNotFound { slot } | ForgeError::HandlerMismatch { slot, .. } => {
                Some(*slot)
            }
            ForgeError::UnknownSlot(_) | ForgeError::Callable(_) => None,
        }
    }

    /// Whether a required slot was missing.
    pub fn is_slot_not_found(&self) -> bool {
        matches!(self, ForgeError::SlotNotFound { .. })
    }
}
