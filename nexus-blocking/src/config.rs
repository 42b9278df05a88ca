//! Construction-time tuning for [`BoundedQueue`](crate::BoundedQueue).

/// Default number of backoff snooze iterations before suspending.
///
/// Each snooze uses `crossbeam_utils::Backoff::snooze()` which starts with
/// spinning and eventually yields to the OS scheduler.
pub const DEFAULT_SNOOZE_ITERS: usize = 8;

/// Queue tuning.
///
/// A blocked `put`/`take` first retries with backoff (releasing the lock
/// between attempts) before suspending on a condition variable. More
/// snoozing burns CPU but avoids the sleep/wake syscalls when the other
/// side is about to make progress.
///
/// # Example
///
/// ```
/// use nexus_blocking::{BoundedQueue, Broadcast, Config};
///
/// // Plain monitor behavior: suspend as soon as the predicate fails
/// let q = BoundedQueue::<u64, Broadcast>::with_config(16, Config::new().snooze_iters(0)).unwrap();
/// assert_eq!(q.config().snooze_iters, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Backoff rounds attempted before suspending.
    pub snooze_iters: usize,
}

impl Config {
    /// Returns the default configuration.
    pub const fn new() -> Self {
        Self {
            snooze_iters: DEFAULT_SNOOZE_ITERS,
        }
    }

    /// Sets the number of backoff rounds before suspending.
    #[must_use]
    pub const fn snooze_iters(mut self, iters: usize) -> Self {
        self.snooze_iters = iters;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
