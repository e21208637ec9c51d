//! Worker-slot accounting for parallel quicksort.
//!
//! Each top-level sort call builds its own pool; nothing here is global, so
//! concurrent sorts in one process do not contend for each other's slots.
//! The pool only counts live workers — the threads themselves are scoped, so
//! the scope exit in the sort entry point is the join barrier that
//! guarantees every spawned partition has finished before the sort returns.

use std::sync::{Mutex, MutexGuard};
use std::thread::Scope;

/// Shared slot counter for one sort invocation.
pub(crate) struct PoolState {
    live: Mutex<usize>,
    capacity: usize,
}

impl PoolState {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            live: Mutex::new(0),
            capacity,
        }
    }

    /// Reserves a worker slot; returns `false` when all slots are taken, in
    /// which case the caller sorts the partition inline.
    pub(crate) fn try_reserve(&self) -> bool {
        let mut live = self.lock();
        if *live < self.capacity {
            *live += 1;
            true
        } else {
            false
        }
    }

    /// Releases a slot reserved with [`try_reserve`](Self::try_reserve).
    pub(crate) fn release(&self) {
        let mut live = self.lock();
        *live = live.saturating_sub(1);
    }

    // The lock is held only across counter updates; a poisoned mutex can
    // only mean a panic in that window, and the counter is still coherent.
    fn lock(&self) -> MutexGuard<'_, usize> {
        match self.live.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Handle passed down the quicksort recursion: the spawn scope plus the slot
/// counter. `Copy` so it can be moved into worker closures freely.
pub(crate) struct Pool<'scope, 'env> {
    pub(crate) scope: &'scope Scope<'scope, 'env>,
    pub(crate) state: &'env PoolState,
}

impl Clone for Pool<'_, '_> {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for Pool<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_bounded() {
        let state = PoolState::new(2);
        assert!(state.try_reserve());
        assert!(state.try_reserve());
        assert!(!state.try_reserve());
        state.release();
        assert!(state.try_reserve());
    }

    #[test]
    fn test_zero_capacity_never_reserves() {
        let state = PoolState::new(0);
        assert!(!state.try_reserve());
    }
}
