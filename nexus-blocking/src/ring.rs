//! Fixed-capacity circular storage behind [`BoundedQueue`](crate::BoundedQueue).
//!
//! The ring is allocated once at construction and never grows:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ slots: [Option<T>; capacity]                          │
//! ├───────────────────────────────────────────────────────┤
//! │ head  - next slot to remove                           │
//! │ tail  - next slot to fill                             │
//! │ len   - number of live slots                          │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Live items occupy `len` slots starting at `head`, wrapping at `capacity`.
//! `tail == (head + len) % capacity` always holds.
//!
//! The ring itself is not synchronized. The queue only touches it while
//! holding its mutex.

/// Circular buffer of `capacity` slots with head/tail cursors.
pub(crate) struct Ring<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Ring<T> {
    /// Allocates an empty ring. `capacity` must be non-zero.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "ring capacity must be non-zero");

        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    pub(crate) fn head(&self) -> usize {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> usize {
        self.tail
    }

    /// Writes `value` into the tail slot.
    ///
    /// # Panics
    ///
    /// Panics if the ring is full. Callers check [`is_full`](Self::is_full)
    /// under the queue lock first.
    #[inline]
    pub(crate) fn push(&mut self, value: T) {
        assert!(!self.is_full(), "push into a full ring");

        debug_assert!(self.slots[self.tail].is_none(), "tail slot already live");
        self.slots[self.tail] = Some(value);
        self.tail = self.advance(self.tail);
        self.len += 1;
        self.debug_check();
    }

    /// Removes the value in the head slot, leaving the slot empty.
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = self.slots[self.head].take();
        debug_assert!(value.is_some(), "head slot was empty");
        self.head = self.advance(self.head);
        self.len -= 1;
        self.debug_check();
        value
    }

    /// Removes every live value in FIFO order.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        while let Some(value) = self.pop() {
            out.push(value);
        }
        out
    }

    #[inline(always)]
    fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.capacity() { 0 } else { next }
    }

    #[inline(always)]
    fn debug_check(&self) {
        debug_assert!(self.len <= self.capacity());
        debug_assert_eq!(self.tail, (self.head + self.len) % self.capacity());
    }
}
