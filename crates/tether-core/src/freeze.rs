//! Deep immutability for values received over IPC.
//!
//! A [`Frozen<T>`] owns its value behind a shared `Arc` and only ever hands
//! out `&T`. Because every nested member of `T` is reached through that
//! shared borrow, the whole tree is immutable for every holder of the
//! handle, however many clones exist.
//!
//! The guarantee holds for plain data. A `T` with interior mutability
//! (`Cell`, `Mutex`, ...) can still change behind a shared borrow; response
//! models never contain such fields.
//!
//! Values decoded from JSON are trees, so freezing never has to deal with
//! cycles.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A transitively immutable, cheaply cloneable value.
pub struct Frozen<T>(Arc<T>);

impl<T> Frozen<T> {
    /// Freeze a value.
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Produce an independent, mutable copy.
    ///
    /// Changes to the copy never reach the frozen value.
    pub fn thaw(&self) -> T
    where
        T: Clone,
    {
        T::clone(&self.0)
    }

    /// Take the value out, cloning only if other handles still share it.
    pub fn into_owned(self) -> T
    where
        T: Clone,
    {
        Arc::unwrap_or_clone(self.0)
    }

    /// Whether two handles share the same frozen allocation.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

/// Freeze `value`, or return it untouched if it is already frozen.
///
/// `deep_freeze(frozen)` yields the same allocation, so freezing is
/// idempotent and never copies.
pub fn deep_freeze<T>(value: impl Into<Frozen<T>>) -> Frozen<T> {
    value.into()
}

impl<T> From<T> for Frozen<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Deref for Frozen<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> AsRef<T> for Frozen<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> Clone for Frozen<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: PartialEq> PartialEq for Frozen<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: Eq> Eq for Frozen<T> {}

impl<T: fmt::Debug> fmt::Debug for Frozen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: fmt::Display> fmt::Display for Frozen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: Serialize> Serialize for Frozen<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct Outer {
        a: Inner,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Inner {
        b: i64,
    }

    #[test]
    fn test_freeze_is_idempotent() {
        let frozen: Frozen<Outer> = deep_freeze(Outer { a: Inner { b: 1 } });
        let again: Frozen<Outer> = deep_freeze(frozen.clone());

        assert!(Frozen::ptr_eq(&frozen, &again));
        assert_eq!(again.a.b, 1);
    }

    #[test]
    fn test_freeze_is_deep() {
        let frozen: Frozen<Outer> = deep_freeze(Outer { a: Inner { b: 1 } });

        let mut copy = frozen.thaw();
        copy.a.b = 2;

        assert_eq!(frozen.a.b, 1);
        assert_eq!(copy.a.b, 2);
    }

    #[test]
    fn test_nested_json_stays_unchanged_after_thawed_edit() {
        let frozen: Frozen<serde_json::Value> = deep_freeze(json!({"a": {"b": 1}}));

        let mut copy = frozen.thaw();
        copy["a"]["b"] = json!(99);

        assert_eq!(frozen["a"]["b"], json!(1));
    }

    #[test]
    fn test_clones_share_allocation() {
        let frozen: Frozen<Vec<i32>> = deep_freeze(vec![1, 2, 3]);
        let shared = frozen.clone();
        assert!(Frozen::ptr_eq(&frozen, &shared));
        assert_eq!(shared.into_owned(), vec![1, 2, 3]);
    }

    #[test]
    fn test_serializes_transparently() {
        let frozen: Frozen<serde_json::Value> = deep_freeze(json!({"id": "1"}));
        assert_eq!(serde_json::to_string(&frozen).unwrap(), r#"{"id":"1"}"#);
    }
}
