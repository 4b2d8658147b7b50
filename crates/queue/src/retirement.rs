//! Retirement tracking for a shrinking pool of homogeneous workers.
//!
//! Workers call [`RetirementTracker::attempt_to_retire`] at the top of every
//! loop iteration, before blocking for new work. A worker retires exactly when
//! the pool is larger than the number of items still unfinished, so the pool
//! shrinks with the work and no worker is left waiting for an item that will
//! never arrive. Items are counted down by the worker that finished them,
//! after every handshake for that item is complete.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SyncError;
use crate::guard::lock;

const TRACKER: &str = "retirement tracker";

/// Point-in-time view of a tracker's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub items_remaining: usize,
    pub workers_remaining: usize,
    /// Workers that have retired so far.
    pub retired: usize,
}

impl TrackerSnapshot {
    /// Whether every item is finished and every worker has retired.
    pub fn is_drained(&self) -> bool {
        self.items_remaining == 0 && self.workers_remaining == 0
    }
}

#[derive(Debug)]
struct Counts {
    items_remaining: usize,
    workers_remaining: usize,
    total_workers: usize,
}

/// Shared `(items remaining, workers remaining)` pair under one mutex.
///
/// Both counters only ever decrease. The tracker is never reset.
#[derive(Debug)]
pub struct RetirementTracker {
    name: String,
    counts: Mutex<Counts>,
}

impl RetirementTracker {
    pub fn new(name: impl Into<String>, total_items: usize, total_workers: usize) -> Self {
        Self {
            name: name.into(),
            counts: Mutex::new(Counts {
                items_remaining: total_items,
                workers_remaining: total_workers,
                total_workers,
            }),
        }
    }

    /// Retire the caller if the pool outnumbers the unfinished items.
    ///
    /// Returns `true` when the caller must exit its loop, `false` when it
    /// must keep serving.
    pub fn attempt_to_retire(&self) -> Result<bool, SyncError> {
        let mut counts = lock(&self.counts, TRACKER)?;
        if counts.workers_remaining > counts.items_remaining {
            counts.workers_remaining -= 1;
            debug!(
                tracker = %self.name,
                workers_remaining = counts.workers_remaining,
                items_remaining = counts.items_remaining,
                "worker retired"
            );
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Count one item as fully processed.
    pub fn decrement_remaining_items(&self) -> Result<(), SyncError> {
        let mut counts = lock(&self.counts, TRACKER)?;
        counts.items_remaining = counts
            .items_remaining
            .checked_sub(1)
            .ok_or_else(|| SyncError::Underflow {
                tracker: self.name.clone(),
            })?;
        debug!(tracker = %self.name, items_remaining = counts.items_remaining, "item finished");
        Ok(())
    }

    pub fn snapshot(&self) -> Result<TrackerSnapshot, SyncError> {
        let counts = lock(&self.counts, TRACKER)?;
        Ok(TrackerSnapshot {
            items_remaining: counts.items_remaining,
            workers_remaining: counts.workers_remaining,
            retired: counts.total_workers - counts.workers_remaining,
        })
    }
}
