//! Cooperative cancellation for blocked `put`/`take` calls.
//!
//! Threads can't be interrupted from the outside, so a blocking call that
//! should be abortable takes a [`CancelToken`]. Any clone of the token can
//! cancel it; every call waiting on that token then returns `Interrupted`
//! without touching the queue.
//!
//! # Wakeup protocol
//!
//! ```text
//! Waiter:                              Canceller:
//! ─────────────────────                ─────────────────────
//! register(queue) [token lock]
//! lock(queue)                          store(cancelled, true)
//! load(cancelled) -> false             take targets [token lock]
//! wait(cond) [releases queue lock]     lock(queue)
//!                                      notify_all()
//! ```
//!
//! If the canceller takes the targets before the waiter registers, the
//! waiter's later registration is ordered after the flag store and the
//! waiter observes `cancelled` before it suspends. Otherwise the canceller
//! wakes the queue while holding the queue's lock, which can only happen
//! before the waiter checks the flag or after it is already suspended.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Something a cancelled token must wake.
pub(crate) trait Wake: Send + Sync {
    /// Wakes every thread suspended on this object.
    ///
    /// Must take the same lock the waiters hold while checking the token.
    fn wake(&self);
}

struct Inner {
    cancelled: AtomicBool,
    targets: Mutex<Vec<Weak<dyn Wake>>>,
}

/// Handle used to abort blocked queue operations.
///
/// Clones share state. Once cancelled a token stays cancelled; use a fresh
/// token for further calls.
///
/// # Example
///
/// ```
/// use nexus_blocking::{BoundedQueue, CancelToken, PutError};
/// use std::thread;
///
/// let q = BoundedQueue::new(1).unwrap();
/// q.put(1u64);
///
/// let token = CancelToken::new();
/// let producer = {
///     let q = q.clone();
///     let token = token.clone();
///     thread::spawn(move || q.put_cancellable(2, &token))
/// };
///
/// token.cancel();
/// assert_eq!(producer.join().unwrap(), Err(PutError::Interrupted(2)));
/// assert_eq!(q.len(), 1);
/// ```
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Creates a token that isn't cancelled.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                targets: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Cancels the token and wakes every queue a call is waiting on.
    ///
    /// Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);

        let targets = std::mem::take(&mut *self.inner.targets.lock());
        for target in targets.iter().filter_map(Weak::upgrade) {
            target.wake();
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any
    /// clone.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Records `target` as something to wake on cancellation.
    ///
    /// Must be called before the caller first checks [`is_cancelled`] under
    /// the target's lock.
    ///
    /// [`is_cancelled`]: Self::is_cancelled
    pub(crate) fn register(&self, target: Weak<dyn Wake>) {
        let mut targets = self.inner.targets.lock();
        targets.retain(|t| t.strong_count() > 0);
        if !targets.iter().any(|t| Weak::ptr_eq(t, &target)) {
            targets.push(target);
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
