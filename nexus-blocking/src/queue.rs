//! The bounded blocking queue.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crossbeam_utils::Backoff;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::cancel::{CancelToken, Wake};
use crate::config::Config;
use crate::error::{Full, InvalidCapacity, PutError, TakeError};
use crate::ring::Ring;
use crate::signal::{Side, Signal, Split};

/// State shared by every handle to one queue.
struct Shared<T, S> {
    ring: Mutex<Ring<T>>,
    signal: S,
    capacity: usize,
    config: Config,
}

impl<T: Send, S: Signal> Wake for Shared<T, S> {
    fn wake(&self) {
        // Taking the lock orders this wakeup after any in-progress
        // predicate/cancel check.
        let _ring = self.ring.lock();
        self.signal.notify_all();
    }
}

/// Why a blocking wait gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Interrupted,
    Timeout,
}

/// A fixed-capacity FIFO queue shared by any number of producers and
/// consumers.
///
/// [`put`](Self::put) blocks while the queue is full and
/// [`take`](Self::take) blocks while it is empty. The signaling discipline
/// `S` decides which waiters a commit wakes; see [`Signal`].
///
/// `BoundedQueue` is a handle: clones share the same buffer. Items still
/// queued when the last handle is dropped are dropped with it.
///
/// # Example
///
/// ```
/// use nexus_blocking::BoundedQueue;
/// use std::thread;
///
/// let q = BoundedQueue::new(4).unwrap();
///
/// let producer = {
///     let q = q.clone();
///     thread::spawn(move || {
///         for i in 0..100u64 {
///             q.put(i);
///         }
///     })
/// };
///
/// let received: Vec<u64> = (0..100).map(|_| q.take()).collect();
/// producer.join().unwrap();
///
/// assert_eq!(received, (0..100).collect::<Vec<_>>());
/// ```
pub struct BoundedQueue<T, S = Split> {
    shared: Arc<Shared<T, S>>,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue using [`Split`] conditions and the default
    /// [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] if `capacity` is 0.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_blocking::{BoundedQueue, InvalidCapacity};
    ///
    /// let q = BoundedQueue::<String>::new(8).unwrap();
    /// assert_eq!(q.capacity(), 8);
    ///
    /// assert_eq!(BoundedQueue::<String>::new(0).unwrap_err(), InvalidCapacity);
    /// ```
    pub fn new(capacity: usize) -> Result<Self, InvalidCapacity> {
        Self::with_config(capacity, Config::default())
    }
}

impl<T, S: Signal> BoundedQueue<T, S> {
    /// Creates an empty queue with an explicit signaling discipline and
    /// configuration.
    ///
    /// Capacity is exact (no rounding).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] if `capacity` is 0.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_blocking::{BoundedQueue, Broadcast, Config};
    ///
    /// let q = BoundedQueue::<u64, Broadcast>::with_config(5, Config::default()).unwrap();
    /// q.put(1);
    /// assert_eq!(q.take(), 1);
    /// ```
    pub fn with_config(capacity: usize, config: Config) -> Result<Self, InvalidCapacity> {
        if capacity == 0 {
            return Err(InvalidCapacity);
        }

        Ok(Self {
            shared: Arc::new(Shared {
                ring: Mutex::new(Ring::new(capacity)),
                signal: S::default(),
                capacity,
                config,
            }),
        })
    }

    /// Inserts `value`, blocking while the queue is full.
    ///
    /// The value becomes visible to exactly one future [`take`](Self::take).
    pub fn put(&self, value: T) {
        match self.acquire(Side::Producers, None, None) {
            Ok(ring) => self.commit_put(ring, value),
            Err(stop) => unreachable!("uninterruptible put stopped: {stop:?}"),
        }
    }

    /// Removes the oldest value, blocking while the queue is empty.
    pub fn take(&self) -> T {
        match self.acquire(Side::Consumers, None, None) {
            Ok(ring) => self.commit_take(ring),
            Err(stop) => unreachable!("uninterruptible take stopped: {stop:?}"),
        }
    }

    /// Inserts `value`, blocking at most `timeout` while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `Err(PutError::Timeout(value))` if the queue stayed full for
    /// the whole timeout. The value is not inserted.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_blocking::{BoundedQueue, PutError};
    /// use std::time::Duration;
    ///
    /// let q = BoundedQueue::new(1).unwrap();
    /// q.put(1u32);
    ///
    /// let err = q.put_timeout(2, Duration::from_millis(10)).unwrap_err();
    /// assert_eq!(err, PutError::Timeout(2));
    /// ```
    pub fn put_timeout(&self, value: T, timeout: Duration) -> Result<(), PutError<T>> {
        let deadline = Instant::now().checked_add(timeout);
        match self.acquire(Side::Producers, None, deadline) {
            Ok(ring) => {
                self.commit_put(ring, value);
                Ok(())
            }
            Err(stop) => Err(put_error(stop, value)),
        }
    }

    /// Removes the oldest value, blocking at most `timeout` while the queue
    /// is empty.
    ///
    /// # Errors
    ///
    /// Returns `Err(TakeError::Timeout)` if the queue stayed empty for the
    /// whole timeout.
    pub fn take_timeout(&self, timeout: Duration) -> Result<T, TakeError> {
        let deadline = Instant::now().checked_add(timeout);
        match self.acquire(Side::Consumers, None, deadline) {
            Ok(ring) => Ok(self.commit_take(ring)),
            Err(stop) => Err(take_error(stop)),
        }
    }

    /// Attempts to insert `value` without blocking.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the queue is full.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_blocking::{BoundedQueue, Full};
    ///
    /// let q = BoundedQueue::new(2).unwrap();
    ///
    /// assert!(q.try_put(1).is_ok());
    /// assert!(q.try_put(2).is_ok());
    /// assert_eq!(q.try_put(3), Err(Full(3)));
    /// ```
    pub fn try_put(&self, value: T) -> Result<(), Full<T>> {
        let ring = self.shared.ring.lock();
        if ring.is_full() {
            return Err(Full(value));
        }
        self.commit_put(ring, value);
        Ok(())
    }

    /// Attempts to remove the oldest value without blocking.
    ///
    /// Returns `None` if the queue is empty.
    pub fn try_take(&self) -> Option<T> {
        let ring = self.shared.ring.lock();
        if ring.is_empty() {
            return None;
        }
        Some(self.commit_take(ring))
    }

    /// Removes every queued value in FIFO order and wakes blocked producers.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_blocking::BoundedQueue;
    ///
    /// let q = BoundedQueue::new(4).unwrap();
    /// q.put('a');
    /// q.put('b');
    ///
    /// assert_eq!(q.drain(), vec!['a', 'b']);
    /// assert!(q.is_empty());
    /// ```
    pub fn drain(&self) -> Vec<T> {
        let mut ring = self.shared.ring.lock();
        let drained = ring.drain();
        if !drained.is_empty() {
            self.shared.signal.notify(Side::Producers);
        }
        drained
    }

    /// Returns the number of queued values.
    ///
    /// Note: This is a snapshot and may be immediately stale in concurrent contexts.
    #[inline]
    pub fn len(&self) -> usize {
        self.shared.ring.lock().len()
    }

    /// Returns `true` if the queue holds no values.
    ///
    /// Note: This is a snapshot and may be immediately stale in concurrent contexts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shared.ring.lock().is_empty()
    }

    /// Returns `true` if a `put` would block right now.
    ///
    /// Note: This is a snapshot and may be immediately stale in concurrent contexts.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.shared.ring.lock().is_full()
    }

    /// Returns the fixed capacity of the queue.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Returns how many values can be inserted without blocking.
    ///
    /// Note: This is a snapshot and may be immediately stale in concurrent contexts.
    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.shared.capacity - self.len()
    }

    /// Returns the configuration the queue was built with.
    #[inline]
    pub fn config(&self) -> Config {
        self.shared.config
    }

    /// Locks the ring and waits until `side` can make progress.
    ///
    /// 1. Fast path: the predicate already holds.
    /// 2. Backoff: release the lock, snooze, re-check.
    /// 3. Suspend on the discipline's condition, re-checking after every
    ///    wakeup.
    ///
    /// Cancellation and the deadline are only consulted while the predicate
    /// is false, always under the lock.
    fn acquire(
        &self,
        side: Side,
        cancel: Option<&CancelToken>,
        deadline: Option<Instant>,
    ) -> Result<MutexGuard<'_, Ring<T>>, Stop> {
        let shared = &*self.shared;
        let mut ring = shared.ring.lock();

        // Fast path
        if can_proceed(side, &ring) {
            return Ok(ring);
        }

        // Backoff phase
        let backoff = Backoff::new();
        for _ in 0..shared.config.snooze_iters {
            check_stop(cancel, deadline)?;
            MutexGuard::unlocked(&mut ring, || backoff.snooze());

            if can_proceed(side, &ring) {
                return Ok(ring);
            }
        }

        // Suspend phase
        trace!(
            waiter = %side,
            len = ring.len(),
            head = ring.head(),
            tail = ring.tail(),
            capacity = ring.capacity(),
            "suspending"
        );
        loop {
            check_stop(cancel, deadline)?;

            match deadline {
                Some(deadline) => {
                    shared.signal.wait_until(side, &mut ring, deadline);
                }
                None => shared.signal.wait(side, &mut ring),
            }

            if can_proceed(side, &ring) {
                return Ok(ring);
            }
        }
    }

    fn commit_put(&self, mut ring: MutexGuard<'_, Ring<T>>, value: T) {
        ring.push(value);
        self.shared.signal.notify(Side::Consumers);
    }

    fn commit_take(&self, mut ring: MutexGuard<'_, Ring<T>>) -> T {
        let Some(value) = ring.pop() else {
            unreachable!("consumer proceeded on an empty ring");
        };
        self.shared.signal.notify(Side::Producers);
        value
    }
}

impl<T: Send + 'static, S: Signal> BoundedQueue<T, S> {
    /// Inserts `value`, blocking while the queue is full, until `token` is
    /// cancelled.
    ///
    /// Cancellation only takes effect while the call is waiting: if space is
    /// available the value is inserted even when `token` is already
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns `Err(PutError::Interrupted(value))` if `token` was cancelled
    /// while waiting. The queue is left untouched.
    pub fn put_cancellable(&self, value: T, token: &CancelToken) -> Result<(), PutError<T>> {
        self.register(token);
        match self.acquire(Side::Producers, Some(token), None) {
            Ok(ring) => {
                self.commit_put(ring, value);
                Ok(())
            }
            Err(stop) => Err(put_error(stop, value)),
        }
    }

    /// Removes the oldest value, blocking while the queue is empty, until
    /// `token` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `Err(TakeError::Interrupted)` if `token` was cancelled while
    /// waiting. Nothing is removed.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_blocking::{BoundedQueue, CancelToken, TakeError};
    ///
    /// let q = BoundedQueue::<u64>::new(4).unwrap();
    /// let token = CancelToken::new();
    /// token.cancel();
    ///
    /// assert_eq!(q.take_cancellable(&token), Err(TakeError::Interrupted));
    /// ```
    pub fn take_cancellable(&self, token: &CancelToken) -> Result<T, TakeError> {
        self.register(token);
        match self.acquire(Side::Consumers, Some(token), None) {
            Ok(ring) => Ok(self.commit_take(ring)),
            Err(stop) => Err(take_error(stop)),
        }
    }

    fn register(&self, token: &CancelToken) {
        let target: Weak<Shared<T, S>> = Arc::downgrade(&self.shared);
        token.register(target);
    }
}

#[inline]
fn can_proceed<T>(side: Side, ring: &Ring<T>) -> bool {
    match side {
        Side::Producers => !ring.is_full(),
        Side::Consumers => !ring.is_empty(),
    }
}

#[inline]
fn check_stop(cancel: Option<&CancelToken>, deadline: Option<Instant>) -> Result<(), Stop> {
    if cancel.is_some_and(CancelToken::is_cancelled) {
        return Err(Stop::Interrupted);
    }
    if deadline.is_some_and(|d| Instant::now() >= d) {
        return Err(Stop::Timeout);
    }
    Ok(())
}

fn put_error<T>(stop: Stop, value: T) -> PutError<T> {
    debug!(?stop, "put abandoned");
    match stop {
        Stop::Interrupted => PutError::Interrupted(value),
        Stop::Timeout => PutError::Timeout(value),
    }
}

fn take_error(stop: Stop) -> TakeError {
    debug!(?stop, "take abandoned");
    match stop {
        Stop::Interrupted => TakeError::Interrupted,
        Stop::Timeout => TakeError::Timeout,
    }
}

impl<T, S> Clone for BoundedQueue<T, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, S: Signal + fmt::Debug> fmt::Debug for BoundedQueue<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("signal", &self.shared.signal)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Broadcast;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn queue<S: Signal>(capacity: usize) -> BoundedQueue<u64, S> {
        BoundedQueue::with_config(capacity, Config::default()).unwrap()
    }

    /// (len, head, tail) read under the lock.
    fn cursors<T, S>(q: &BoundedQueue<T, S>) -> (usize, usize, usize) {
        let ring = q.shared.ring.lock();
        (ring.len(), ring.head(), ring.tail())
    }

    /// Gives spawned threads time to reach their wait.
    fn settle() {
        thread::sleep(Duration::from_millis(50));
    }

    // ============================================================================
    // Construction
    // ============================================================================

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(BoundedQueue::<u64>::new(0).unwrap_err(), InvalidCapacity);
        assert!(BoundedQueue::<u64, Broadcast>::with_config(0, Config::default()).is_err());
    }

    #[test]
    fn new_queue_is_empty() {
        let q = BoundedQueue::<u64>::new(3).unwrap();

        assert_eq!(cursors(&q), (0, 0, 0));
        assert_eq!(q.capacity(), 3);
        assert_eq!(q.remaining_capacity(), 3);
        assert!(q.is_empty());
        assert!(!q.is_full());
    }

    #[test]
    fn capacity_is_exact() {
        let q = BoundedQueue::<u64>::new(5).unwrap();
        for i in 0..5 {
            q.try_put(i).unwrap();
        }
        assert!(q.is_full());
        assert_eq!(q.try_put(5), Err(Full(5)));
    }

    // ============================================================================
    // Basic Operations
    // ============================================================================

    fn basic_put_take<S: Signal>() {
        let q = queue::<S>(4);

        q.put(1);
        q.put(2);
        q.put(3);
        assert_eq!(q.len(), 3);

        assert_eq!(q.take(), 1);
        assert_eq!(q.take(), 2);
        assert_eq!(q.take(), 3);
        assert!(q.is_empty());
    }

    #[test]
    fn basic_put_take_split() {
        basic_put_take::<Split>();
    }

    #[test]
    fn basic_put_take_broadcast() {
        basic_put_take::<Broadcast>();
    }

    #[test]
    fn try_take_empty() {
        let q = queue::<Split>(2);
        assert_eq!(q.try_take(), None);

        q.try_put(9).unwrap();
        assert_eq!(q.try_take(), Some(9));
        assert_eq!(q.try_take(), None);
    }

    #[test]
    fn cursors_advance_and_wrap() {
        let q = queue::<Split>(3);

        q.put(1);
        q.put(2);
        assert_eq!(cursors(&q), (2, 0, 2));

        q.take();
        q.put(3);
        q.put(4);
        assert_eq!(cursors(&q), (3, 1, 1));

        q.take();
        assert_eq!(cursors(&q), (2, 2, 1));
    }

    #[test]
    fn drain_returns_fifo_and_frees_space() {
        let q = queue::<Split>(3);
        q.put(1);
        q.put(2);
        q.put(3);

        assert_eq!(q.drain(), vec![1, 2, 3]);
        assert_eq!(q.remaining_capacity(), 3);
        assert!(q.drain().is_empty());
    }

    #[test]
    fn clones_share_the_buffer() {
        let q = queue::<Split>(2);
        let other = q.clone();

        q.put(7);
        assert_eq!(other.len(), 1);
        assert_eq!(other.take(), 7);
        assert!(q.is_empty());
    }

    #[test]
    fn values_dropped_with_last_handle() {
        let drop_count = Arc::new(AtomicUsize::new(0));

        #[derive(Debug)]
        struct DropCounter(Arc<AtomicUsize>);
        impl Drop for DropCounter {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let q = BoundedQueue::new(4).unwrap();
        let other = q.clone();
        for _ in 0..3 {
            q.put(DropCounter(Arc::clone(&drop_count)));
        }

        drop(q.take());
        assert_eq!(drop_count.load(Ordering::SeqCst), 1);

        drop(q);
        assert_eq!(drop_count.load(Ordering::SeqCst), 1);

        drop(other);
        assert_eq!(drop_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn debug_output() {
        let q = queue::<Broadcast>(2);
        q.put(1);
        let s = format!("{q:?}");
        assert!(s.contains("capacity: 2"));
        assert!(s.contains("len: 1"));
        assert!(s.contains("Broadcast"));
    }

    // ============================================================================
    // Blocking
    // ============================================================================

    fn take_blocks_until_put<S: Signal>() {
        let q = queue::<S>(1);

        let consumer = {
            let q = q.clone();
            thread::spawn(move || q.take())
        };

        settle();
        assert!(!consumer.is_finished());

        q.put(42);
        assert_eq!(consumer.join().unwrap(), 42);
    }

    #[test]
    fn take_blocks_until_put_split() {
        take_blocks_until_put::<Split>();
    }

    #[test]
    fn take_blocks_until_put_broadcast() {
        take_blocks_until_put::<Broadcast>();
    }

    fn put_blocks_until_take<S: Signal>() {
        let q = queue::<S>(1);
        q.put(1);

        let producer = {
            let q = q.clone();
            thread::spawn(move || q.put(2))
        };

        settle();
        assert!(!producer.is_finished());
        assert_eq!(q.len(), 1);

        assert_eq!(q.take(), 1);
        producer.join().unwrap();
        assert_eq!(q.take(), 2);
    }

    #[test]
    fn put_blocks_until_take_split() {
        put_blocks_until_take::<Split>();
    }

    #[test]
    fn put_blocks_until_take_broadcast() {
        put_blocks_until_take::<Broadcast>();
    }

    #[test]
    fn blocks_without_backoff() {
        let q = BoundedQueue::<u64, Split>::with_config(1, Config::new().snooze_iters(0)).unwrap();

        let consumer = {
            let q = q.clone();
            thread::spawn(move || q.take())
        };

        settle();
        q.put(5);
        assert_eq!(consumer.join().unwrap(), 5);
    }

    fn drain_wakes_blocked_producer<S: Signal>() {
        let q = BoundedQueue::<u64, S>::with_config(1, Config::new().snooze_iters(0)).unwrap();
        q.put(1);

        let producer = {
            let q = q.clone();
            thread::spawn(move || q.put(2))
        };

        settle();
        assert!(!producer.is_finished());

        assert_eq!(q.drain(), vec![1]);
        producer.join().unwrap();
        assert_eq!(q.take(), 2);
    }

    #[test]
    fn drain_wakes_blocked_producer_split() {
        drain_wakes_blocked_producer::<Split>();
    }

    #[test]
    fn drain_wakes_blocked_producer_broadcast() {
        drain_wakes_blocked_producer::<Broadcast>();
    }

    // ============================================================================
    // Timeouts
    // ============================================================================

    #[test]
    fn put_timeout_on_full_queue() {
        let q = queue::<Split>(1);
        q.put(1);

        let start = Instant::now();
        assert_eq!(
            q.put_timeout(2, Duration::from_millis(20)),
            Err(PutError::Timeout(2))
        );
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(cursors(&q), (1, 0, 0));
    }

    #[test]
    fn take_timeout_on_empty_queue() {
        let q = queue::<Broadcast>(1);

        assert_eq!(
            q.take_timeout(Duration::from_millis(20)),
            Err(TakeError::Timeout)
        );
        assert_eq!(cursors(&q), (0, 0, 0));
    }

    #[test]
    fn timeout_succeeds_when_ready() {
        let q = queue::<Split>(1);

        q.put_timeout(3, Duration::ZERO).unwrap();
        assert_eq!(q.take_timeout(Duration::ZERO), Ok(3));
    }

    #[test]
    fn take_timeout_woken_by_put() {
        let q = queue::<Split>(1);

        let consumer = {
            let q = q.clone();
            thread::spawn(move || q.take_timeout(Duration::from_secs(10)))
        };

        settle();
        q.put(11);
        assert_eq!(consumer.join().unwrap(), Ok(11));
    }

    #[test]
    fn put_timeout_woken_by_take() {
        let q = queue::<Split>(1);
        q.put(1);

        let producer = {
            let q = q.clone();
            thread::spawn(move || q.put_timeout(2, Duration::from_secs(10)))
        };

        settle();
        assert!(!producer.is_finished());

        assert_eq!(q.take(), 1);
        assert_eq!(producer.join().unwrap(), Ok(()));
        assert_eq!(q.take(), 2);
    }

    #[test]
    fn huge_timeout_does_not_overflow() {
        let q = queue::<Split>(1);
        q.put(1);
        assert_eq!(q.take_timeout(Duration::MAX), Ok(1));
    }

    // ============================================================================
    // Cancellation
    // ============================================================================

    fn cancel_blocked_put_leaves_queue_intact<S: Signal>() {
        let q = queue::<S>(2);
        q.put(1);
        q.put(2);
        q.take();
        q.put(3);
        let before = cursors(&q);
        assert_eq!(before, (2, 1, 1));

        let token = CancelToken::new();
        let producer = {
            let q = q.clone();
            let token = token.clone();
            thread::spawn(move || q.put_cancellable(4, &token))
        };

        settle();
        assert!(!producer.is_finished());

        token.cancel();
        assert_eq!(producer.join().unwrap(), Err(PutError::Interrupted(4)));
        assert_eq!(cursors(&q), before);

        // Still fully usable
        assert_eq!(q.take(), 2);
        q.put(5);
        assert_eq!(q.take(), 3);
        assert_eq!(q.take(), 5);
    }

    #[test]
    fn cancel_blocked_put_leaves_queue_intact_split() {
        cancel_blocked_put_leaves_queue_intact::<Split>();
    }

    #[test]
    fn cancel_blocked_put_leaves_queue_intact_broadcast() {
        cancel_blocked_put_leaves_queue_intact::<Broadcast>();
    }

    fn cancel_blocked_take<S: Signal>() {
        let q = queue::<S>(2);

        let token = CancelToken::new();
        let consumer = {
            let q = q.clone();
            let token = token.clone();
            thread::spawn(move || q.take_cancellable(&token))
        };

        settle();
        token.cancel();

        assert_eq!(consumer.join().unwrap(), Err(TakeError::Interrupted));
        assert_eq!(cursors(&q), (0, 0, 0));

        q.put(8);
        assert_eq!(q.take(), 8);
    }

    #[test]
    fn cancel_blocked_take_split() {
        cancel_blocked_take::<Split>();
    }

    #[test]
    fn cancel_blocked_take_broadcast() {
        cancel_blocked_take::<Broadcast>();
    }

    #[test]
    fn cancelled_token_does_not_block_ready_calls() {
        let q = queue::<Split>(1);
        let token = CancelToken::new();
        token.cancel();

        q.put_cancellable(1, &token).unwrap();
        assert_eq!(q.take_cancellable(&token), Ok(1));
        assert_eq!(
            q.take_cancellable(&token),
            Err(TakeError::Interrupted)
        );
    }

    #[test]
    fn cancel_wakes_every_waiter_on_token() {
        let q = queue::<Split>(1);
        let token = CancelToken::new();

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let q = q.clone();
                let token = token.clone();
                thread::spawn(move || q.take_cancellable(&token))
            })
            .collect();

        settle();
        token.cancel();

        for c in consumers {
            assert_eq!(c.join().unwrap(), Err(TakeError::Interrupted));
        }
    }

    #[test]
    fn cancel_only_affects_its_token() {
        let q = queue::<Broadcast>(1);
        let cancelled = CancelToken::new();
        let live = CancelToken::new();

        let doomed = {
            let q = q.clone();
            let token = cancelled.clone();
            thread::spawn(move || q.take_cancellable(&token))
        };
        let survivor = {
            let q = q.clone();
            let token = live.clone();
            thread::spawn(move || q.take_cancellable(&token))
        };

        settle();
        cancelled.cancel();
        assert_eq!(doomed.join().unwrap(), Err(TakeError::Interrupted));

        settle();
        assert!(!survivor.is_finished());

        q.put(6);
        assert_eq!(survivor.join().unwrap(), Ok(6));
    }
}
