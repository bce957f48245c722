use std::ops::Index;

use crate::{
    compare::{Compare, First, Natural},
    error::{Error, Result},
    iter,
    tree::RedBlackTree,
};

/// An ordered map from unique keys to values, stored as `(K, V)` pairs.
#[derive(Clone)]
pub struct TreeMap<K, V, C = Natural> {
    tree: RedBlackTree<(K, V), First, C>,
}

pub struct Iter<'a, K: 'a, V: 'a> {
    inner: iter::Iter<'a, (K, V)>,
}

impl<'a, K: 'a, V: 'a> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Iter<'a, K, V> {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    pub fn new() -> Self {
        Self {
            tree: RedBlackTree::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: RedBlackTree::with_capacity(capacity),
        }
    }
}

impl<K, V, C: Compare<K> + Default> Default for TreeMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C: Compare<K>> TreeMap<K, V, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            tree: RedBlackTree::with_comparator(comparator),
        }
    }

    /// The engine underneath, for cursor based access.
    pub fn as_tree(&self) -> &RedBlackTree<(K, V), First, C> {
        &self.tree
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Inserts the pair unless the key is already present, in which case the
    /// stored value is kept. Returns whether the pair was inserted.
    pub fn insert(&mut self, key: K, value: V) -> Result<bool> {
        Ok(self.tree.insert((key, value))?.1)
    }

    /// Inserts the pair, or replaces the value of an existing key and
    /// returns the old one.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<Option<V>> {
        let cursor = self.tree.find(&key);
        match self.tree.value_mut(cursor) {
            Some((_, stored)) => Ok(Some(std::mem::replace(stored, value))),
            None => {
                self.tree.insert((key, value))?;
                Ok(None)
            }
        }
    }

    /// The value stored under `key`, inserting `default()` first when the
    /// key is missing.
    pub fn get_or_insert_with<F>(
        &mut self,
        key: K,
        default: F,
    ) -> Result<&mut V>
    where
        F: FnOnce() -> V,
    {
        let hint = self.tree.lower_bound(&key);
        let exists = match self.tree.get(hint) {
            Some((found, _)) => !self.tree.comparator().less(&key, found),
            None => false,
        };
        let cursor = if exists {
            hint
        } else {
            // lower_bound is exactly the position after the new key.
            self.tree.insert_hint(hint, (key, default()))?
        };

        match self.tree.value_mut(cursor) {
            Some((_, value)) => Ok(value),
            None => Err(Error::StaleCursor),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(self.tree.find(key)).map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let cursor = self.tree.find(key);
        self.tree.value_mut(cursor).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let cursor = self.tree.find(key);
        if cursor.is_end() {
            return None;
        }
        self.tree.remove(cursor).ok().map(|(_, value)| value)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(key, value)| (key, value))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(key, value)| (key, value))
    }

    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            inner: self.tree.iter(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Pairs whose keys fall in `[low, high)`.
    pub fn range(&self, low: &K, high: &K) -> Iter<K, V> {
        let inner = if self.tree.comparator().less(high, low) {
            self.tree.range(self.tree.end(), self.tree.end())
        } else {
            self.tree
                .range(self.tree.lower_bound(low), self.tree.lower_bound(high))
        };
        Iter { inner }
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }
}

impl<K, V, C> std::fmt::Debug for TreeMap<K, V, C>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_map()
            .entries(self.tree.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for TreeMap<K, V, C> {
    fn eq(&self, other: &TreeMap<K, V, C>) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for TreeMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for TreeMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<K: Ord, V: Ord, C> Ord for TreeMap<K, V, C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<K, V, C: Compare<K>> Index<&K> for TreeMap<K, V, C> {
    type Output = V;

    /// Panics when the key is missing.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for TreeMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().collect(),
        }
    }
}

impl<K, V, C> IntoIterator for TreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = iter::IntoIter<(K, V)>;

    fn into_iter(self) -> iter::IntoIter<(K, V)> {
        self.tree.into_iter()
    }
}

impl<'a, K, V, C: Compare<K>> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
