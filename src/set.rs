use crate::{
    compare::{Compare, Identity, Natural},
    error::Result,
    iter::{IntoIter, Iter},
    tree::RedBlackTree,
};

/// An ordered set of unique elements.
#[derive(Clone)]
pub struct TreeSet<T, C = Natural> {
    tree: RedBlackTree<T, Identity, C>,
}

impl<T: Ord> TreeSet<T> {
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

impl<T, C: Compare<T> + Default> Default for TreeSet<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C: Compare<T>> TreeSet<T, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            tree: RedBlackTree::with_comparator(comparator),
        }
    }

    /// The engine underneath, for cursor based access.
    pub fn as_tree(&self) -> &RedBlackTree<T, Identity, C> {
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

    /// Returns whether the value was newly inserted. An equivalent element
    /// already in the set is kept.
    pub fn insert(&mut self, value: T) -> Result<bool> {
        Ok(self.tree.insert(value)?.1)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.tree.contains(value)
    }

    pub fn get(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.find(value))
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.tree.remove_key(value) > 0
    }

    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// First element not ordered before `value`.
    pub fn lower_bound(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.lower_bound(value))
    }

    /// First element ordered after `value`.
    pub fn upper_bound(&self, value: &T) -> Option<&T> {
        self.tree.get(self.tree.upper_bound(value))
    }

    /// Elements in `[low, high)`.
    pub fn range(&self, low: &T, high: &T) -> Iter<T> {
        if self.tree.comparator().less(high, low) {
            return self.tree.range(self.tree.end(), self.tree.end());
        }
        self.tree
            .range(self.tree.lower_bound(low), self.tree.lower_bound(high))
    }

    pub fn iter(&self) -> Iter<T> {
        self.tree.iter()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }
}

impl<T: std::fmt::Debug, C> std::fmt::Debug for TreeSet<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_set().entries(self.tree.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for TreeSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq, C> Eq for TreeSet<T, C> {}

impl<T: PartialOrd, C> PartialOrd for TreeSet<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<T: Ord, C> Ord for TreeSet<T, C> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<T, C: Compare<T>> Extend<T> for TreeSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for TreeSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().collect(),
        }
    }
}

impl<T, C> IntoIterator for TreeSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.tree.into_iter()
    }
}

impl<'a, T, C> IntoIterator for &'a TreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.tree.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Descending;

    #[test]
    fn insert_does_not_duplicate() {
        let mut set = TreeSet::<i32>::new();
        assert!(set.insert(3).unwrap());
        assert!(set.insert(1).unwrap());
        assert!(!set.insert(3).unwrap());
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(!set.contains(&2));
    }

    #[test]
    fn bounds_and_range() {
        let set: TreeSet<i32> = [10, 20, 30, 40].into_iter().collect();
        assert_eq!(set.lower_bound(&20), Some(&20));
        assert_eq!(set.upper_bound(&20), Some(&30));
        assert_eq!(set.lower_bound(&41), None);
        assert_eq!(
            set.range(&15, &40).copied().collect::<Vec<_>>(),
            vec![20, 30]
        );
        assert_eq!(set.range(&40, &15).count(), 0);
    }

    #[test]
    fn descending_comparator() {
        let mut set = TreeSet::with_comparator(Descending);
        set.extend([1, 3, 2]);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(set.first(), Some(&3));
    }

    #[test]
    fn remove_and_compare() {
        let mut a: TreeSet<i32> = (1..=5).collect();
        let b: TreeSet<i32> = (1..=4).collect();
        assert!(a > b);
        assert!(a.remove(&5));
        assert!(!a.remove(&5));
        assert_eq!(a, b);
        assert_eq!(format!("{:?}", a), "{1, 2, 3, 4}");
    }
}
