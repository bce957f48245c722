//! Key projection and ordering policies a tree is built with.

/// Projects a stored element to the key the tree orders it by.
pub trait KeyOf<T> {
    type Key: ?Sized;

    fn key_of(value: &T) -> &Self::Key;
}

/// Elements are their own keys (sets).
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<T> KeyOf<T> for Identity {
    type Key = T;

    #[inline]
    fn key_of(value: &T) -> &T {
        value
    }
}

/// Elements are `(key, value)` pairs ordered by their first field (maps).
#[derive(Debug, Clone, Copy, Default)]
pub struct First;

impl<K, V> KeyOf<(K, V)> for First {
    type Key = K;

    #[inline]
    fn key_of(value: &(K, V)) -> &K {
        &value.0
    }
}

/// A strict weak ordering over keys.
///
/// Two keys are equivalent when neither is `less` than the other. The
/// ordering must not change while a tree holds keys ordered by it.
pub trait Compare<K: ?Sized> {
    fn less(&self, lhs: &K, rhs: &K) -> bool;
}

/// Ascending order by `Ord`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        lhs < rhs
    }
}

/// Descending order by `Ord`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Descending;

impl<K: Ord + ?Sized> Compare<K> for Descending {
    #[inline]
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        rhs < lhs
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        self(lhs, rhs)
    }
}
