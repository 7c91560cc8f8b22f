//! Shared immutable storage for value payloads.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Reference-counted, immutable payload.
///
/// Values are never mutated after construction, so cloning a `DataValue`
/// shares its payload instead of copying it. Only this crate constructs
/// `Heap`s; everything else goes through the `DataValue` factories.
pub struct Heap<T>(Arc<T>);

impl<T> Heap<T> {
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T: Clone> Heap<T> {
    /// Clone the payload out of the shared allocation.
    pub fn to_owned_inner(&self) -> T {
        T::clone(&self.0)
    }
}

impl<T> Clone for Heap<T> {
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
