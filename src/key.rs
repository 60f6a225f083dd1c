//! The ordering abstraction every [`Tree`][crate::Tree] operation is driven by.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An immutable wrapper around a single orderable value.
///
/// The tree never compares raw values directly - it always asks [`Key::compare`] which way to
/// go. Two keys are the same logical entry iff `compare` reports [`Ordering::Equal`].
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use rank_bst::Key;
///
/// let a = Key::new(1);
/// let b = Key::from(2);
///
/// assert_eq!(a.compare(&b), Ordering::Less);
/// assert_eq!(b.render(), "2");
/// ```
#[derive(Clone, Copy, Default)]
pub struct Key<T>(T);

impl<T> Key<T> {
    /// Wraps `value` in a `Key`.
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrows the wrapped value.
    pub fn get(&self) -> &T {
        &self.0
    }

    /// Unwraps the key, returning the value it was built from.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Ord> Key<T> {
    /// Three-way comparison consistent with the wrapped value's natural order.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T: fmt::Display> Key<T> {
    /// A textual rendering of the key for diagnostics.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl<T> From<T> for Key<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Ord> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl<T: Ord> Eq for Key<T> {}

impl<T: Ord> PartialOrd for Key<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Key<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<T: Hash> Hash for Key<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.0).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
