//! Reentrancy guard for vault entry points.
//!
//! The first active entry point takes the lock for its whole duration; any
//! nested attempt fails with [`VaultError::Reentrancy`]. The lock is released
//! when the [`ReentrancyGuard`] drops, so every exit path (including `?`
//! early returns) unlocks it.

use crate::error::{VaultError, VaultResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Per-vault lock flag. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyLock {
    locked: Arc<AtomicBool>,
}

impl ReentrancyLock {
    /// Creates an unlocked flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lock, failing if it is already held.
    pub fn enter(&self) -> VaultResult<ReentrancyGuard> {
        if self
            .locked
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Reentrant vault call rejected");
            return Err(VaultError::Reentrancy);
        }
        Ok(ReentrancyGuard {
            locked: Arc::clone(&self.locked),
        })
    }

    /// Whether an entry point is currently active.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

/// Scoped hold on a [`ReentrancyLock`].
#[derive(Debug)]
pub struct ReentrancyGuard {
    locked: Arc<AtomicBool>,
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        self.locked.store(false, Ordering::SeqCst);
    }
}
