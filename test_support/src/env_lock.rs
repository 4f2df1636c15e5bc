//! Serialise environment mutations across tests.
//!
//! Tests that set `PROTOROOT`, `GOPATH` or `PROTOMAKE_MAKE` for a spawned
//! binary hold an [`EnvLock`] so concurrently running tests never observe
//! each other's values.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// RAII guard holding the process-wide environment lock.
pub struct EnvLock {
    _guard: MutexGuard<'static, ()>,
}

impl fmt::Debug for EnvLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvLock").finish_non_exhaustive()
    }
}

impl EnvLock {
    /// Block until the environment lock is free. A lock poisoned by a
    /// panicking test is recovered rather than propagated.
    pub fn acquire() -> Self {
        let guard = ENV_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Self { _guard: guard }
    }
}
