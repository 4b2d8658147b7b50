//! Typed participant identities and id-indexed slots.
//!
//! Every primitive that keeps one entry per participant (a completion signal
//! per client, a readiness signal per server) stores it in an [`IdSlots`].
//! Lookups are bounds-checked against the population the slots were created
//! for, so an out-of-range id surfaces as [`SyncError::UnknownId`] instead of
//! a panic or a silently shared slot.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// A participant identity drawn from a bounded domain `[0, capacity)`.
pub trait Identity: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Human-readable kind used in errors and logs (e.g. `"client"`).
    const KIND: &'static str;

    fn index(self) -> usize;

    fn from_index(index: usize) -> Self;
}

/// Identity of a client passing through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(usize);

/// Identity of a server within its stage's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(usize);

impl ClientId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }
}

impl ServerId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }
}

impl Identity for ClientId {
    const KIND: &'static str = "client";

    fn index(self) -> usize {
        self.0
    }

    fn from_index(index: usize) -> Self {
        Self(index)
    }
}

impl Identity for ServerId {
    const KIND: &'static str = "server";

    fn index(self) -> usize {
        self.0
    }

    fn from_index(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Iterate every id of a population of `count`.
pub fn population<I: Identity>(count: usize) -> impl Iterator<Item = I> {
    (0..count).map(I::from_index)
}

// ── IdSlots ──────────────────────────────────────────────────────────

/// Fixed-capacity mapping from an [`Identity`] to one value per id.
///
/// The capacity is fixed at construction; there is no insert or remove.
pub struct IdSlots<I: Identity, V> {
    slots: Vec<V>,
    _id: PhantomData<fn(I)>,
}

impl<I: Identity, V> IdSlots<I, V> {
    /// Create `capacity` slots, each initialised by `init`.
    pub fn new(capacity: usize, mut init: impl FnMut(I) -> V) -> Self {
        Self {
            slots: population(capacity).map(&mut init).collect(),
            _id: PhantomData,
        }
    }

    /// Look up the slot for `id`.
    pub fn get(&self, id: I) -> Result<&V, SyncError> {
        self.slots.get(id.index()).ok_or(SyncError::UnknownId {
            kind: I::KIND,
            index: id.index(),
            capacity: self.slots.len(),
        })
    }

    /// Look up the slot for `id` for mutation.
    pub fn get_mut(&mut self, id: I) -> Result<&mut V, SyncError> {
        let capacity = self.slots.len();
        self.slots.get_mut(id.index()).ok_or(SyncError::UnknownId {
            kind: I::KIND,
            index: id.index(),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &V)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (I::from_index(index), slot))
    }
}

impl<I: Identity, V: fmt::Debug> fmt::Debug for IdSlots<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
