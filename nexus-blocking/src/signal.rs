//! Wait/notify disciplines for the queue's monitor.
//!
//! A [`Signal`] owns the condition variable(s) a [`BoundedQueue`] suspends on.
//! The queue holds its mutex, checks its predicate in a loop, and calls
//! [`Signal::wait`] while the predicate is false. After every committed
//! `put` or `take` it calls [`Signal::notify`] for the side that may now
//! make progress.
//!
//! Two disciplines ship with the crate:
//!
//! ```text
//! Broadcast (one condition):
//! ┌─────────────────────────────────────────────────────────┐
//! │ put  -> notify_all(cond)   wakes producers AND consumers │
//! │ take -> notify_all(cond)   wakes producers AND consumers │
//! └─────────────────────────────────────────────────────────┘
//!
//! Split (two conditions):
//! ┌─────────────────────────────────────────────────────────┐
//! │ put  -> notify_all(not_empty)   wakes consumers only     │
//! │ take -> notify_all(not_full)    wakes producers only     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Both are observably identical. `Split` avoids waking threads that can't
//! make progress; `Broadcast` is the classic single-monitor form.
//!
//! Wakeups are never exclusive. A woken thread may lose the race for the
//! slot, so the caller must always re-check its predicate.
//!
//! [`BoundedQueue`]: crate::BoundedQueue

use std::fmt;
use std::time::Instant;

use parking_lot::{Condvar, MutexGuard};

/// Which group of waiters an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Threads blocked in `put`, waiting for space.
    Producers,
    /// Threads blocked in `take`, waiting for an item.
    Consumers,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Producers => write!(f, "producer"),
            Self::Consumers => write!(f, "consumer"),
        }
    }
}

/// Condition-variable backend for a [`BoundedQueue`](crate::BoundedQueue).
///
/// Implementations only decide *which* condition a side sleeps on and *who*
/// gets woken. The predicate loop lives in the queue, so an implementation
/// is free to wake more threads than necessary but must never miss one:
/// after `notify(side)`, every thread suspended in `wait(side, ..)` must be
/// woken.
pub trait Signal: Default + Send + Sync + 'static {
    /// Suspends the calling thread, atomically releasing `guard`.
    ///
    /// The lock is re-acquired before returning. May return spuriously.
    fn wait<T>(&self, side: Side, guard: &mut MutexGuard<'_, T>);

    /// Like [`wait`](Signal::wait), but gives up at `deadline`.
    ///
    /// Returns `true` if the deadline elapsed.
    fn wait_until<T>(&self, side: Side, guard: &mut MutexGuard<'_, T>, deadline: Instant) -> bool;

    /// Wakes every thread suspended on `side`.
    fn notify(&self, side: Side);

    /// Wakes every suspended thread on both sides.
    ///
    /// Used when a waiter's exit condition changes for reasons other than
    /// the buffer, e.g. cancellation.
    fn notify_all(&self);
}

// ============================================================================
// Broadcast
// ============================================================================

/// Single condition shared by producers and consumers.
///
/// Every commit wakes every waiter. Mirrors a classic monitor where both
/// sides sleep on the same object and `notifyAll` is used throughout.
pub struct Broadcast {
    cond: Condvar,
}

impl Default for Broadcast {
    fn default() -> Self {
        Self {
            cond: Condvar::new(),
        }
    }
}

impl Signal for Broadcast {
    #[inline]
    fn wait<T>(&self, _side: Side, guard: &mut MutexGuard<'_, T>) {
        self.cond.wait(guard);
    }

    #[inline]
    fn wait_until<T>(&self, _side: Side, guard: &mut MutexGuard<'_, T>, deadline: Instant) -> bool {
        self.cond.wait_until(guard, deadline).timed_out()
    }

    #[inline]
    fn notify(&self, _side: Side) {
        self.cond.notify_all();
    }

    #[inline]
    fn notify_all(&self) {
        self.cond.notify_all();
    }
}

impl fmt::Debug for Broadcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Broadcast")
    }
}

// ============================================================================
// Split
// ============================================================================

/// Separate `not_full` and `not_empty` conditions.
///
/// `take` signals `not_full` (consumers tell producers there is room) and
/// `put` signals `not_empty` (producers tell consumers there is data).
pub struct Split {
    not_full: Condvar,
    not_empty: Condvar,
}

impl Split {
    #[inline(always)]
    fn cond(&self, side: Side) -> &Condvar {
        match side {
            Side::Producers => &self.not_full,
            Side::Consumers => &self.not_empty,
        }
    }
}

impl Default for Split {
    fn default() -> Self {
        Self {
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }
}

impl Signal for Split {
    #[inline]
    fn wait<T>(&self, side: Side, guard: &mut MutexGuard<'_, T>) {
        self.cond(side).wait(guard);
    }

    #[inline]
    fn wait_until<T>(&self, side: Side, guard: &mut MutexGuard<'_, T>, deadline: Instant) -> bool {
        self.cond(side).wait_until(guard, deadline).timed_out()
    }

    #[inline]
    fn notify(&self, side: Side) {
        self.cond(side).notify_all();
    }

    #[inline]
    fn notify_all(&self) {
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }
}

impl fmt::Debug for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Split")
    }
}
