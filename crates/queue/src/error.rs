//! Synchronization error types.

use thiserror::Error;

/// Errors raised by the handoff primitives.
///
/// Apart from [`SyncError::Interrupted`], every variant marks a protocol
/// defect in the caller: a signal raised twice, an id outside the population,
/// a completion for an item that was never queued.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A lock was poisoned by a participant that panicked while holding it.
    #[error("wait on {primitive} was interrupted")]
    Interrupted { primitive: &'static str },

    #[error("{kind} id {index} is outside the population of {capacity}")]
    UnknownId {
        kind: &'static str,
        index: usize,
        capacity: usize,
    },

    #[error("signal {channel}[{index}] raised again before it was consumed")]
    DoubleSignal { channel: String, index: usize },

    #[error("{kind} {index} is already queued on {queue}")]
    AlreadyQueued {
        queue: String,
        kind: &'static str,
        index: usize,
    },

    #[error("{kind} {index} is not in flight on {queue}")]
    NotInFlight {
        queue: String,
        kind: &'static str,
        index: usize,
    },

    #[error("{kind} {index} already has an assignment")]
    AlreadyAssigned { kind: &'static str, index: usize },

    #[error("more items completed than {tracker} was created with")]
    Underflow { tracker: String },
}
