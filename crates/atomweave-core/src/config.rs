//! # Space Configuration
//!
//! Tunables fixed when an [`crate::AtomSpace`] is created.

use crate::primitives::{DEFAULT_LOCK_POOL_SIZE, MAX_LOCK_POOL_SIZE};
use crate::types::AtomError;
use serde::{Deserialize, Serialize};

/// Settings for a root atom space. Child spaces inherit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    /// Number of read/write locks shared by every atom in the space.
    pub lock_pool_size: usize,
}

impl SpaceConfig {
    #[must_use]
    pub const fn with_lock_pool_size(lock_pool_size: usize) -> Self {
        Self { lock_pool_size }
    }

    /// Reject settings the store cannot run with.
    pub fn validate(&self) -> Result<(), AtomError> {
        if self.lock_pool_size == 0 || self.lock_pool_size > MAX_LOCK_POOL_SIZE {
            return Err(AtomError::Config(format!(
                "lock_pool_size must be in 1..={}, got {}",
                MAX_LOCK_POOL_SIZE, self.lock_pool_size
            )));
        }
        Ok(())
    }
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            lock_pool_size: DEFAULT_LOCK_POOL_SIZE,
        }
    }
}
