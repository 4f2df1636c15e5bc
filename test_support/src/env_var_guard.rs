//! Guard for temporarily overriding environment variables in tests.
//!
//! `std::env::set_var` and `remove_var` are `unsafe` in Rust 2024 because they
//! mutate process-global state. Hold an [`EnvLock`](crate::env_lock::EnvLock)
//! while any guard is alive; the guard restores the previous value on drop.
//!
//! # Examples
//!
//! ```rust
//! use test_support::{env_lock::EnvLock, env_var_guard::EnvVarGuard};
//!
//! let _lock = EnvLock::acquire();
//! {
//!     let _guard = EnvVarGuard::set("PROTOMAKE_DOC_EXAMPLE", "/usr/bin/gmake");
//!     assert_eq!(
//!         std::env::var("PROTOMAKE_DOC_EXAMPLE").as_deref(),
//!         Ok("/usr/bin/gmake")
//!     );
//! }
//! assert!(std::env::var("PROTOMAKE_DOC_EXAMPLE").is_err());
//! ```

use std::{borrow::Cow, ffi::OsString};

/// RAII guard that resets an environment variable to its previous value on
/// drop.
#[derive(Debug)]
pub struct EnvVarGuard {
    name: Cow<'static, str>,
    prev: Option<OsString>,
}

impl EnvVarGuard {
    /// Set `name` to `val` until the guard drops.
    #[must_use]
    pub fn set(name: impl Into<Cow<'static, str>>, val: &str) -> Self {
        let name = name.into();
        let prev = std::env::var_os(&*name);
        // SAFETY: callers hold `EnvLock`, serialising environment mutations.
        unsafe { std::env::set_var(&*name, val) };
        Self { name, prev }
    }

    /// Remove `name` until the guard drops.
    #[must_use]
    pub fn remove(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        let prev = std::env::var_os(&*name);
        // SAFETY: callers hold `EnvLock`, serialising environment mutations.
        unsafe { std::env::remove_var(&*name) };
        Self { name, prev }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: callers still hold `EnvLock` while the prior value is
        // restored.
        unsafe {
            if let Some(ref v) = self.prev {
                std::env::set_var(&*self.name, v);
            } else {
                std::env::remove_var(&*self.name);
            }
        }
    }
}
