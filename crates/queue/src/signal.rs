//! Binary signals and the id-indexed rendezvous channel built from them.
//!
//! A [`Signal`] is raised by one party and consumed by exactly one other.
//! It is binary: a second raise before the first is consumed is reported as
//! [`SyncError::DoubleSignal`] rather than counted, because in a strict
//! one-to-one handshake that can only mean a lost or duplicated grant.
//!
//! A [`RendezvousChannel`] is one such signal per participant id, used where
//! two specific parties must synchronize directly instead of through a queue.

use std::sync::{Condvar, Mutex};

use tracing::debug;

use crate::error::SyncError;
use crate::guard::{self, lock};
use crate::id::{IdSlots, Identity};

const SIGNAL: &str = "signal";

/// A one-shot, reusable binary signal optionally carrying a value.
#[derive(Debug)]
pub struct Signal<T = ()> {
    pending: Mutex<Option<T>>,
    raised: Condvar,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
            raised: Condvar::new(),
        }
    }

    /// Raise the signal with `value`. Never blocks beyond the lock hold time.
    ///
    /// Returns `false` without touching the pending value if the signal is
    /// already raised and not yet consumed.
    pub fn raise(&self, value: T) -> Result<bool, SyncError> {
        let mut pending = lock(&self.pending, SIGNAL)?;
        if pending.is_some() {
            return Ok(false);
        }
        *pending = Some(value);
        drop(pending);
        self.raised.notify_one();
        Ok(true)
    }

    /// Block until the signal is raised, then consume it.
    pub fn wait(&self) -> Result<T, SyncError> {
        let mut pending = lock(&self.pending, SIGNAL)?;
        loop {
            if let Some(value) = pending.take() {
                return Ok(value);
            }
            pending = guard::wait(&self.raised, pending, SIGNAL)?;
        }
    }

    /// Consume the signal if it is raised, without blocking.
    pub fn try_take(&self) -> Result<Option<T>, SyncError> {
        Ok(lock(&self.pending, SIGNAL)?.take())
    }

    pub fn is_raised(&self) -> Result<bool, SyncError> {
        Ok(lock(&self.pending, SIGNAL)?.is_some())
    }
}

// ── RendezvousChannel ────────────────────────────────────────────────

/// A named set of binary signals, one per participant id.
///
/// Each signal has one designated raiser and one designated consumer. The
/// optional payload `T` travels on the same edge that wakes the consumer.
pub struct RendezvousChannel<I: Identity, T = ()> {
    name: String,
    signals: IdSlots<I, Signal<T>>,
}

impl<I: Identity, T> RendezvousChannel<I, T> {
    /// Create a channel with one signal per id in `[0, capacity)`.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            signals: IdSlots::new(capacity, |_| Signal::new()),
        }
    }

    /// Raise the signal for `id`, handing `value` to whoever waits on it.
    pub fn signal(&self, id: I, value: T) -> Result<(), SyncError> {
        debug!(channel = %self.name, %id, "signal");
        if self.signals.get(id)?.raise(value)? {
            Ok(())
        } else {
            Err(SyncError::DoubleSignal {
                channel: self.name.clone(),
                index: id.index(),
            })
        }
    }

    /// Block until the signal for `id` is raised, then consume it.
    pub fn wait(&self, id: I) -> Result<T, SyncError> {
        let signal = self.signals.get(id)?;
        debug!(channel = %self.name, %id, "waiting");
        signal.wait()
    }

    /// Consume the signal for `id` if it is raised, without blocking.
    pub fn try_take(&self, id: I) -> Result<Option<T>, SyncError> {
        self.signals.get(id)?.try_take()
    }

    pub fn is_raised(&self, id: I) -> Result<bool, SyncError> {
        self.signals.get(id)?.is_raised()
    }
}

impl<I: Identity> RendezvousChannel<I, ()> {
    /// Raise the payload-free signal for `id`.
    pub fn notify(&self, id: I) -> Result<(), SyncError> {
        self.signal(id, ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::id::{ClientId, ServerId};

    #[test]
    fn raise_then_wait_does_not_block() {
        let signal = Signal::new();
        assert!(signal.raise(5u32).unwrap());
        assert_eq!(signal.wait().unwrap(), 5);
        assert_eq!(signal.try_take().unwrap(), None);
    }

    #[test]
    fn signal_is_binary() {
        let signal = Signal::new();
        assert!(signal.raise(()).unwrap());
        assert!(!signal.raise(()).unwrap(), "second raise must be refused");
        signal.wait().unwrap();
        assert!(!signal.is_raised().unwrap());
    }

    #[test]
    fn waiter_wakes_on_raise() {
        let signal = Arc::new(Signal::<u32>::new());
        let (tx, rx) = mpsc::channel();

        let waiter = signal.clone();
        let handle = thread::spawn(move || {
            let value = waiter.wait().unwrap();
            tx.send(value).unwrap();
        });

        assert!(
            rx.recv_timeout(Duration::from_millis(50)).is_err(),
            "waiter returned before the signal was raised"
        );
        signal.raise(42).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
        handle.join().unwrap();
    }

    #[test]
    fn channel_signals_are_independent_per_id() {
        let channel: RendezvousChannel<ServerId> = RendezvousChannel::new("ready", 3);
        channel.notify(ServerId::new(1)).unwrap();

        assert!(!channel.is_raised(ServerId::new(0)).unwrap());
        assert!(channel.is_raised(ServerId::new(1)).unwrap());
        assert_eq!(channel.try_take(ServerId::new(2)).unwrap(), None);
        channel.wait(ServerId::new(1)).unwrap();
    }

    #[test]
    fn double_signal_is_a_protocol_error() {
        let channel: RendezvousChannel<ClientId, ServerId> = RendezvousChannel::new("assigned", 2);
        channel.signal(ClientId::new(0), ServerId::new(1)).unwrap();
        let err = channel.signal(ClientId::new(0), ServerId::new(2)).unwrap_err();
        assert_eq!(
            err,
            SyncError::DoubleSignal {
                channel: "assigned".into(),
                index: 0
            }
        );
        // The first payload is preserved.
        assert_eq!(channel.wait(ClientId::new(0)).unwrap(), ServerId::new(1));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let channel: RendezvousChannel<ClientId> = RendezvousChannel::new("left", 2);
        assert!(matches!(
            channel.notify(ClientId::new(2)),
            Err(SyncError::UnknownId { capacity: 2, .. })
        ));
    }
}
