//! Blocking FIFO shared by many producers and many consumers.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use tracing::debug;

use crate::error::SyncError;
use crate::guard::{self, lock};

const WAIT_QUEUE: &str = "wait queue";

/// A FIFO whose consumers block until an entry exists.
///
/// Any consumer may take any entry. FIFO order gives fairness only; callers
/// must not rely on which consumer receives which entry.
#[derive(Debug)]
pub struct WaitQueue<T> {
    name: String,
    entries: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> WaitQueue<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, 0)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            available: Condvar::new(),
        }
    }

    /// Append `entry` and wake one waiting consumer.
    pub fn push(&self, entry: T) -> Result<(), SyncError> {
        let mut entries = lock(&self.entries, WAIT_QUEUE)?;
        entries.push_back(entry);
        let depth = entries.len();
        drop(entries);
        debug!(queue = %self.name, depth, "push");
        self.available.notify_one();
        Ok(())
    }

    /// Block until an entry exists, then remove and return the head.
    pub fn wait_pop(&self) -> Result<T, SyncError> {
        let mut entries = lock(&self.entries, WAIT_QUEUE)?;
        loop {
            if let Some(entry) = entries.pop_front() {
                debug!(queue = %self.name, depth = entries.len(), "pop");
                return Ok(entry);
            }
            entries = guard::wait(&self.available, entries, WAIT_QUEUE)?;
        }
    }

    /// Remove the head if one exists, without blocking.
    pub fn try_pop(&self) -> Result<Option<T>, SyncError> {
        Ok(lock(&self.entries, WAIT_QUEUE)?.pop_front())
    }

    pub fn len(&self) -> Result<usize, SyncError> {
        Ok(lock(&self.entries, WAIT_QUEUE)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, SyncError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_for_a_single_consumer() {
        let queue = WaitQueue::new("fifo");
        for i in 0..4 {
            queue.push(i).unwrap();
        }
        assert_eq!(queue.len().unwrap(), 4);
        let drained: Vec<i32> = (0..4).map(|_| queue.wait_pop().unwrap()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3]);
        assert!(queue.is_empty().unwrap());
        assert_eq!(queue.try_pop().unwrap(), None);
    }

    #[test]
    fn consumer_blocks_until_push() {
        let queue = Arc::new(WaitQueue::new("blocking"));
        let (tx, rx) = mpsc::channel();

        let consumer = queue.clone();
        let handle = thread::spawn(move || {
            tx.send(consumer.wait_pop().unwrap()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        queue.push("entry").unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "entry");
        handle.join().unwrap();
    }

    #[test]
    fn each_entry_goes_to_exactly_one_consumer() {
        let queue = Arc::new(WaitQueue::new("shared"));
        let per_consumer = 25;
        let consumers = 4;

        let handles: Vec<_> = (0..consumers)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    (0..per_consumer)
                        .map(|_| queue.wait_pop().unwrap())
                        .collect::<Vec<usize>>()
                })
            })
            .collect();

        for i in 0..per_consumer * consumers {
            queue.push(i).unwrap();
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for entry in handle.join().unwrap() {
                assert!(seen.insert(entry), "entry {entry} delivered twice");
            }
        }
        assert_eq!(seen.len(), per_consumer * consumers);
    }
}
