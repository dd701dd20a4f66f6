//! Conditional Lock Module
//!
//! One locking abstraction for both thread-safety modes of the cache.

use parking_lot::{Mutex, MutexGuard};

// == Conditional Lock ==
/// Guards a value with a mutex whose acquisition mode is chosen at
/// construction.
///
/// - Blocking: callers wait for the lock, giving linearizable access.
/// - Unsynchronized: acquisition never waits. Overlapping callers are a
///   usage error and panic instead of corrupting the guarded value.
#[derive(Debug)]
pub struct ConditionalLock<T> {
    inner: Mutex<T>,
    blocking: bool,
}

impl<T> ConditionalLock<T> {
    // == Constructor ==
    pub fn new(value: T, blocking: bool) -> Self {
        Self {
            inner: Mutex::new(value),
            blocking,
        }
    }

    /// Returns true if acquisition waits for other holders.
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    // == Acquire ==
    /// Acquires the lock for the lifetime of the returned guard.
    ///
    /// # Panics
    /// In unsynchronized mode, if another caller currently holds the guard.
    pub fn acquire(&self) -> MutexGuard<'_, T> {
        if self.blocking {
            return self.inner.lock();
        }
        match self.inner.try_lock() {
            Some(guard) => guard,
            None => panic!("concurrent access to a cache built without thread safety"),
        }
    }
}
