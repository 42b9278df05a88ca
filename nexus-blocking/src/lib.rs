//! A bounded blocking MPMC queue built on a classic monitor.
//!
//! [`BoundedQueue`] is a fixed-capacity circular buffer shared by any number
//! of producer and consumer threads. [`put`](BoundedQueue::put) blocks while
//! the queue is full, [`take`](BoundedQueue::take) blocks while it is empty,
//! and values come out in exactly the order they went in.
//!
//! # Design
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Mutex<Ring<T>>                                               │
//! │   slots: [Option<T>; capacity]   head ─┐        tail ─┐      │
//! │   ┌───┬───┬───┬───┬───┐               ▼               ▼      │
//! │   │   │ a │ b │ c │   │   live items in [head, head + len)   │
//! │   └───┴───┴───┴───┴───┘                                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Signal: Split { not_full, not_empty } | Broadcast { cond }   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - One allocation at construction. No per-item allocation, no growth.
//! - Every read or write of `{slots, head, tail, len}` happens under the
//!   mutex, so partial updates are never observable.
//! - Waiters always re-check their predicate after waking. Wakeups are
//!   broadcast and never exclusive.
//!
//! # Blocking Strategy
//!
//! Like a spin-then-park channel, a blocked call escalates in three phases:
//!
//! ```text
//! Phase 1: Fast path
//! ├── Lock, predicate already true, commit
//! └── No waiting at all
//!
//! Phase 2: Backoff (release lock, snooze, re-lock, re-check)
//! ├── crossbeam's Backoff::snooze()
//! ├── Config::snooze_iters rounds (default: 8)
//! └── Catches the other side committing "soon"
//!
//! Phase 3: Suspend
//! ├── Wait on the discipline's condition variable
//! └── Re-check the predicate after every wakeup
//! ```
//!
//! Set `snooze_iters` to 0 for plain monitor behavior.
//!
//! # Signaling Disciplines
//!
//! | Discipline | Conditions | `put` wakes | `take` wakes |
//! |------------|-----------|-------------|--------------|
//! | [`Split`] (default) | `not_full`, `not_empty` | consumers | producers |
//! | [`Broadcast`] | one | everyone | everyone |
//!
//! Both give the same observable behavior. `Split` wakes fewer threads.
//!
//! # Example
//!
//! ```
//! use nexus_blocking::BoundedQueue;
//! use std::thread;
//!
//! let q = BoundedQueue::new(5).unwrap();
//!
//! let producers: Vec<_> = (0..2u64)
//!     .map(|id| {
//!         let q = q.clone();
//!         thread::spawn(move || {
//!             for i in 0..50 {
//!                 q.put(id * 1000 + i);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! let mut received: Vec<u64> = (0..100).map(|_| q.take()).collect();
//! for p in producers {
//!     p.join().unwrap();
//! }
//!
//! received.sort_unstable();
//! assert_eq!(received.len(), 100);
//! assert!(q.is_empty());
//! ```
//!
//! # Non-blocking and Bounded Waits
//!
//! ```
//! use nexus_blocking::{BoundedQueue, Full, TakeError};
//! use std::time::Duration;
//!
//! let q = BoundedQueue::new(1).unwrap();
//!
//! q.try_put(1).unwrap();
//! assert_eq!(q.try_put(2), Err(Full(2)));
//!
//! assert_eq!(q.try_take(), Some(1));
//! assert_eq!(q.take_timeout(Duration::from_millis(1)), Err(TakeError::Timeout));
//! ```
//!
//! # Cancellation
//!
//! A thread waiting in [`put_cancellable`](BoundedQueue::put_cancellable) or
//! [`take_cancellable`](BoundedQueue::take_cancellable) returns `Interrupted`
//! as soon as its [`CancelToken`] is cancelled. Nothing is inserted or
//! removed in that case; a rejected `put` value is handed back in the error.
//!
//! # Fairness
//!
//! None. A woken thread can lose the freed slot to another thread and go
//! back to sleep, with no bound on how often that happens.
//!
//! # Logging
//!
//! Suspensions are reported as `tracing` `TRACE` events and abandoned
//! waits (cancelled or timed out) as `DEBUG` events. The crate installs no
//! subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cancel;
mod config;
mod error;
mod queue;
mod ring;
mod signal;

pub use cancel::CancelToken;
pub use config::{Config, DEFAULT_SNOOZE_ITERS};
pub use error::{Full, InvalidCapacity, PutError, TakeError};
pub use queue::BoundedQueue;
pub use signal::{Broadcast, Side, Signal, Split};

/// A [`BoundedQueue`] using the single-condition [`Broadcast`] discipline.
pub type BroadcastQueue<T> = BoundedQueue<T, Broadcast>;
