//! Shared, immutable-handle wrapper for heap-allocated value parts.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Reference-counted handle to the heap part of a [`Value`](super::Value).
///
/// The constructor is crate-private: heap values are only created through
/// the `Value::` factory methods, which keeps every pair, vector and record
/// behind the same sharing discipline. Cloning a `Heap` shares the
/// allocation; mutation goes through the slot locks inside the pointee.
pub struct Heap<T>(Arc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }

    /// Whether two handles point at the same allocation (Scheme `eq?`).
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// The pointee, if this is the last handle to it.
    #[inline]
    pub(crate) fn try_unwrap(self) -> Option<T> {
        Arc::try_unwrap(self.0).ok()
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
