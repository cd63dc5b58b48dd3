//! # Lock Pool
//!
//! A fixed-size table of read/write locks shared by every atom built from it.
//!
//! An atom does not own a lock. Its value map and incoming index live in a
//! [`PooledCell`], and the lock guarding that cell is picked from the pool by
//! the atom's content hash. Two unrelated atoms may share a lock; that costs
//! throughput, never correctness.
//!
//! ## Rules
//!
//! - A cell is only ever accessed through the lock its owner's hash selects.
//!   The hash is immutable, so the choice never changes.
//! - At most one pool lock is held by a thread at any time. Pool locks are
//!   not reentrant, and a collision would otherwise self-deadlock.

use crate::hash::avalanche;
use crate::primitives::{DEFAULT_LOCK_POOL_SIZE, MAX_LOCK_POOL_SIZE};
use crate::types::{AtomError, ContentHash};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Process-local pool of read/write locks, sized at construction.
pub struct LockPool {
    locks: Box<[RwLock<()>]>,
}

impl LockPool {
    /// Create a pool with `size` locks.
    pub fn new(size: usize) -> Result<Self, AtomError> {
        if size == 0 || size > MAX_LOCK_POOL_SIZE {
            return Err(AtomError::Config(format!(
                "lock pool size must be in 1..={}, got {}",
                MAX_LOCK_POOL_SIZE, size
            )));
        }
        let locks = (0..size).map(|_| RwLock::new(())).collect();
        Ok(Self { locks })
    }

    /// One-lock pool for process-wide constant atoms such as the truth key.
    pub(crate) fn single() -> Self {
        Self {
            locks: Box::new([RwLock::new(())]),
        }
    }

    /// Number of locks in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Slot index used for a given content hash.
    #[must_use]
    pub fn slot_for(&self, hash: ContentHash) -> usize {
        // Re-mix so that the fixed top bit of link hashes does not bias the slot.
        (avalanche(hash.value()) % self.locks.len() as u64) as usize
    }

    pub(crate) fn lock_for(&self, hash: ContentHash) -> &RwLock<()> {
        &self.locks[self.slot_for(hash)]
    }
}

impl Default for LockPool {
    fn default() -> Self {
        Self {
            locks: (0..DEFAULT_LOCK_POOL_SIZE).map(|_| RwLock::new(())).collect(),
        }
    }
}

impl fmt::Debug for LockPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockPool")
            .field("size", &self.locks.len())
            .finish()
    }
}

// =============================================================================
// POOLED CELL
// =============================================================================

/// Data guarded by a lock that lives somewhere else.
pub(crate) struct PooledCell<T> {
    data: UnsafeCell<T>,
}

// SAFETY: every shared access goes through `read`/`write`, which require the
// guarding lock, exactly like `RwLock<T>`.
unsafe impl<T: Send + Sync> Sync for PooledCell<T> {}

impl<T> PooledCell<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            data: UnsafeCell::new(value),
        }
    }

    /// Shared access under the guarding lock.
    ///
    /// # Safety
    ///
    /// `lock` must be the one lock used for every access to this cell.
    pub(crate) unsafe fn read<'a>(&'a self, lock: &'a RwLock<()>) -> PooledRead<'a, T> {
        let guard = lock.read();
        PooledRead {
            _guard: guard,
            // SAFETY: the shared lock excludes writers of this cell.
            data: unsafe { &*self.data.get() },
        }
    }

    /// Exclusive access under the guarding lock.
    ///
    /// # Safety
    ///
    /// `lock` must be the one lock used for every access to this cell.
    pub(crate) unsafe fn write<'a>(&'a self, lock: &'a RwLock<()>) -> PooledWrite<'a, T> {
        let guard = lock.write();
        PooledWrite {
            _guard: guard,
            // SAFETY: the exclusive lock excludes all other access to this cell.
            data: unsafe { &mut *self.data.get() },
        }
    }
}

pub(crate) struct PooledRead<'a, T> {
    _guard: RwLockReadGuard<'a, ()>,
    data: &'a T,
}

impl<T> Deref for PooledRead<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.data
    }
}

pub(crate) struct PooledWrite<'a, T> {
    _guard: RwLockWriteGuard<'a, ()>,
    data: &'a mut T,
}

impl<T> Deref for PooledWrite<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.data
    }
}

impl<T> DerefMut for PooledWrite<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.data
    }
}
