//! Lock and condition-variable helpers that turn poisoning into [`SyncError`].

use std::sync::{Condvar, Mutex, MutexGuard};

use crate::error::SyncError;

/// Acquire `mutex`, reporting a poisoned lock as an interrupted wait on `primitive`.
pub(crate) fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    primitive: &'static str,
) -> Result<MutexGuard<'a, T>, SyncError> {
    mutex
        .lock()
        .map_err(|_| SyncError::Interrupted { primitive })
}

/// Release `guard` and block on `cond` until notified. May wake spuriously.
pub(crate) fn wait<'a, T>(
    cond: &Condvar,
    guard: MutexGuard<'a, T>,
    primitive: &'static str,
) -> Result<MutexGuard<'a, T>, SyncError> {
    cond.wait(guard)
        .map_err(|_| SyncError::Interrupted { primitive })
}
