use super::env_overrides::OVERRIDE_VARS;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Exclusive access to the process environment for one test.
///
/// Every variable `apply_env_overrides` reads starts out unset, so values
/// exported in the developer's shell cannot leak into assertions. The
/// previous values come back on drop.
pub(crate) struct EnvScope {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvScope {
    pub(crate) fn isolated() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let saved = OVERRIDE_VARS
            .iter()
            .map(|&key| (key, std::env::var(key).ok()))
            .collect();
        for key in OVERRIDE_VARS {
            // SAFETY: the scope holds ENV_LOCK; no other test touches the
            // environment until it is dropped.
            unsafe { std::env::remove_var(key) };
        }
        Self { saved, _lock: lock }
    }

    pub(crate) fn with(self, key: &'static str, value: &str) -> Self {
        debug_assert!(OVERRIDE_VARS.contains(&key), "{key} is not restored on drop");
        // SAFETY: ENV_LOCK is held by `self`.
        unsafe { std::env::set_var(key, value) };
        self
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        for (key, previous) in &self.saved {
            // SAFETY: ENV_LOCK is released only after this body runs.
            unsafe {
                match previous {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
