//! Error types for [`BoundedQueue`](crate::BoundedQueue) operations.
//!
//! Errors from insertion carry the rejected value so the caller can retry,
//! reroute or drop it.

/// Returned by construction when `capacity == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("queue capacity must be greater than zero")]
pub struct InvalidCapacity;

/// Returned by [`BoundedQueue::try_put`](crate::BoundedQueue::try_put) when
/// the queue is full.
///
/// Contains the value that couldn't be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("queue is full")]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that couldn't be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Error returned by the cancellable and bounded-wait `put` variants.
///
/// In both cases the value was **not** inserted and is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PutError<T> {
    /// The waiting producer was cancelled through its
    /// [`CancelToken`](crate::CancelToken).
    #[error("put interrupted while waiting for space")]
    Interrupted(T),

    /// The deadline elapsed while the queue was still full.
    #[error("put timed out while waiting for space")]
    Timeout(T),
}

impl<T> PutError<T> {
    /// Returns the value that couldn't be inserted.
    pub fn into_inner(self) -> T {
        match self {
            Self::Interrupted(v) | Self::Timeout(v) => v,
        }
    }

    /// Returns `true` if this error is the `Interrupted` variant.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }

    /// Returns `true` if this error is the `Timeout` variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Error returned by the cancellable and bounded-wait `take` variants.
///
/// Nothing was removed from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TakeError {
    /// The waiting consumer was cancelled through its
    /// [`CancelToken`](crate::CancelToken).
    #[error("take interrupted while waiting for an item")]
    Interrupted,

    /// The deadline elapsed while the queue was still empty.
    #[error("take timed out while waiting for an item")]
    Timeout,
}

impl TakeError {
    /// Returns `true` if this error is the `Interrupted` variant.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Returns `true` if this error is the `Timeout` variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_error_returns_value() {
        assert_eq!(PutError::Interrupted("a").into_inner(), "a");
        assert_eq!(PutError::Timeout(7).into_inner(), 7);
        assert_eq!(Full(3u8).into_inner(), 3);
    }

    #[test]
    fn predicates() {
        assert!(PutError::Interrupted(()).is_interrupted());
        assert!(!PutError::Interrupted(()).is_timeout());
        assert!(PutError::Timeout(()).is_timeout());
        assert!(TakeError::Interrupted.is_interrupted());
        assert!(TakeError::Timeout.is_timeout());
        assert!(!TakeError::Timeout.is_interrupted());
    }

    #[test]
    fn display() {
        assert_eq!(
            InvalidCapacity.to_string(),
            "queue capacity must be greater than zero"
        );
        assert_eq!(Full(1).to_string(), "queue is full");
        assert_eq!(
            PutError::Interrupted(1).to_string(),
            "put interrupted while waiting for space"
        );
        assert_eq!(
            TakeError::Timeout.to_string(),
            "take timed out while waiting for an item"
        );
    }
}
