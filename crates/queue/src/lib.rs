//! Blocking handoff primitives for coordinating fixed pools of threads.
//!
//! - [`HandoffQueue`]: many producers hand an id to a shared consumer pool and
//!   each learns when *its* item was finished.
//! - [`RetirementTracker`]: workers in a shrinking pool decide for themselves
//!   when to exit.
//! - [`RendezvousChannel`]: one binary signal per participant for strict
//!   one-to-one handshakes.
//!
//! Each structure owns exactly one mutex and never calls into another
//! primitive while holding it.

pub mod error;
mod guard;
pub mod handoff;
pub mod id;
pub mod retirement;
pub mod signal;
pub mod wait_queue;

pub use error::SyncError;
pub use handoff::HandoffQueue;
pub use id::{population, ClientId, IdSlots, Identity, ServerId};
pub use retirement::{RetirementTracker, TrackerSnapshot};
pub use signal::{RendezvousChannel, Signal};
pub use wait_queue::WaitQueue;
