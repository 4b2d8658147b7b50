//! Handoff queue: an anonymous consumer pool serving identified producers.
//!
//! Producers enqueue their own id and then block on a completion signal that
//! belongs to that id alone. Consumers take whichever id is at the head,
//! service it, and raise that id's completion signal. The queue never
//! promises a consumer "its" producer; the private completion signal is what
//! tells each producer precisely when *its* item was finished.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use tracing::debug;

use crate::error::SyncError;
use crate::guard::{self, lock};
use crate::id::{IdSlots, Identity};
use crate::signal::RendezvousChannel;

const HANDOFF_QUEUE: &str = "handoff queue";

struct QueueState<I: Identity> {
    entries: VecDeque<I>,
    /// Set from `enqueue` until `signal_completion` for the same id.
    in_flight: IdSlots<I, bool>,
}

/// Shared FIFO of producer ids with one private completion signal per id.
pub struct HandoffQueue<I: Identity> {
    name: String,
    state: Mutex<QueueState<I>>,
    available: Condvar,
    completions: RendezvousChannel<I>,
}

impl<I: Identity> HandoffQueue<I> {
    /// Create a queue for a producer population of `producers` ids.
    pub fn new(name: impl Into<String>, producers: usize) -> Self {
        let name = name.into();
        Self {
            completions: RendezvousChannel::new(format!("{name}.completion"), producers),
            state: Mutex::new(QueueState {
                entries: VecDeque::with_capacity(producers),
                in_flight: IdSlots::new(producers, |_| false),
            }),
            available: Condvar::new(),
            name,
        }
    }

    /// Append `id` and wake one waiting consumer.
    ///
    /// Fails with [`SyncError::AlreadyQueued`] if `id` was enqueued and its
    /// completion has not been signalled yet.
    pub fn enqueue(&self, id: I) -> Result<(), SyncError> {
        let mut state = lock(&self.state, HANDOFF_QUEUE)?;
        let in_flight = state.in_flight.get_mut(id)?;
        if *in_flight {
            return Err(SyncError::AlreadyQueued {
                queue: self.name.clone(),
                kind: I::KIND,
                index: id.index(),
            });
        }
        *in_flight = true;
        state.entries.push_back(id);
        drop(state);
        debug!(queue = %self.name, %id, "enqueue");
        self.available.notify_one();
        Ok(())
    }

    /// Block until an entry exists, then remove and return the head.
    pub fn wait_and_dequeue(&self) -> Result<I, SyncError> {
        let mut state = lock(&self.state, HANDOFF_QUEUE)?;
        loop {
            if let Some(id) = state.entries.pop_front() {
                debug!(queue = %self.name, %id, "dequeue");
                return Ok(id);
            }
            state = guard::wait(&self.available, state, HANDOFF_QUEUE)?;
        }
    }

    /// Block the producer owning `id` until its completion is signalled.
    pub fn wait_for_completion(&self, id: I) -> Result<(), SyncError> {
        self.completions.wait(id)
    }

    /// Raise the completion signal for `id`.
    ///
    /// Fails with [`SyncError::NotInFlight`] if `id` is not currently
    /// enqueued or being serviced, so a completion can fire at most once per
    /// enqueue.
    pub fn signal_completion(&self, id: I) -> Result<(), SyncError> {
        {
            let mut state = lock(&self.state, HANDOFF_QUEUE)?;
            let in_flight = state.in_flight.get_mut(id)?;
            if !*in_flight {
                return Err(SyncError::NotInFlight {
                    queue: self.name.clone(),
                    kind: I::KIND,
                    index: id.index(),
                });
            }
            *in_flight = false;
        }
        debug!(queue = %self.name, %id, "completion");
        self.completions.notify(id)
    }

    /// Number of entries waiting to be dequeued.
    pub fn pending(&self) -> Result<usize, SyncError> {
        Ok(lock(&self.state, HANDOFF_QUEUE)?.entries.len())
    }

    /// Whether `id` has been enqueued and not yet completed.
    pub fn is_in_flight(&self, id: I) -> Result<bool, SyncError> {
        Ok(*lock(&self.state, HANDOFF_QUEUE)?.in_flight.get(id)?)
    }

    /// Consume a raised completion for `id` without blocking.
    pub fn try_take_completion(&self, id: I) -> Result<bool, SyncError> {
        Ok(self.completions.try_take(id)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::id::{population, ClientId};

    #[test]
    fn producer_is_released_by_its_own_completion() {
        let queue: HandoffQueue<ClientId> = HandoffQueue::new("intake", 3);
        let client = ClientId::new(1);
        queue.enqueue(client).unwrap();
        assert!(queue.is_in_flight(client).unwrap());

        let taken = queue.wait_and_dequeue().unwrap();
        assert_eq!(taken, client);
        queue.signal_completion(taken).unwrap();
        queue.wait_for_completion(client).unwrap();
        assert!(!queue.is_in_flight(client).unwrap());
    }

    #[test]
    fn completion_fires_once_per_enqueue() {
        let queue: HandoffQueue<ClientId> = HandoffQueue::new("intake", 2);
        let client = ClientId::new(0);
        queue.enqueue(client).unwrap();
        queue.wait_and_dequeue().unwrap();
        queue.signal_completion(client).unwrap();

        assert!(matches!(
            queue.signal_completion(client),
            Err(SyncError::NotInFlight { index: 0, .. })
        ));
        assert!(queue.try_take_completion(client).unwrap());
        assert!(
            !queue.try_take_completion(client).unwrap(),
            "a consumed completion must not be observable again"
        );
    }

    #[test]
    fn second_wait_for_consumed_completion_blocks() {
        let queue: Arc<HandoffQueue<ClientId>> = Arc::new(HandoffQueue::new("nurse", 1));
        let client = ClientId::new(0);
        queue.enqueue(client).unwrap();
        queue.wait_and_dequeue().unwrap();
        queue.signal_completion(client).unwrap();
        queue.wait_for_completion(client).unwrap();

        let (tx, rx) = mpsc::channel();
        let waiter = queue.clone();
        let handle = thread::spawn(move || {
            waiter.wait_for_completion(client).unwrap();
            tx.send(()).unwrap();
        });
        assert!(
            rx.recv_timeout(Duration::from_millis(50)).is_err(),
            "wait returned on a completion that was already consumed"
        );

        // A fresh cycle releases the second waiter.
        queue.enqueue(client).unwrap();
        queue.wait_and_dequeue().unwrap();
        queue.signal_completion(client).unwrap();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn double_enqueue_is_rejected() {
        let queue: HandoffQueue<ClientId> = HandoffQueue::new("intake", 2);
        queue.enqueue(ClientId::new(1)).unwrap();
        assert!(matches!(
            queue.enqueue(ClientId::new(1)),
            Err(SyncError::AlreadyQueued { index: 1, .. })
        ));
        assert_eq!(queue.pending().unwrap(), 1);
    }

    #[test]
    fn anonymous_pool_serves_every_producer() {
        let producers = 12;
        let queue: Arc<HandoffQueue<ClientId>> = Arc::new(HandoffQueue::new("pool", producers));

        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    let mut served = Vec::new();
                    for _ in 0..producers / 3 {
                        let id = queue.wait_and_dequeue().unwrap();
                        served.push(id);
                        queue.signal_completion(id).unwrap();
                    }
                    served
                })
            })
            .collect();

        let clients: Vec<_> = population::<ClientId>(producers)
            .map(|id| {
                let queue = queue.clone();
                thread::spawn(move || {
                    queue.enqueue(id).unwrap();
                    queue.wait_for_completion(id).unwrap();
                })
            })
            .collect();

        for client in clients {
            client.join().unwrap();
        }
        let mut served: Vec<ClientId> = consumers
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        served.sort();
        assert_eq!(served, population::<ClientId>(producers).collect::<Vec<_>>());
    }
}
