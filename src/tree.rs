use core::fmt::Debug;
use std::{cmp::Ordering, marker::PhantomData};

use log::trace;

use crate::{
    compare::{Compare, KeyOf, Natural},
    error::{Error, Result},
    iter::{Cursor, IntoIter, Iter},
    links::{maximum, minimum, predecessor, successor},
    node::{Color, LinkArena, NodeId},
    pool::NodePool,
    rebalance::{insert_and_rebalance, rebalance_for_erase},
};

enum Position {
    Occupied(NodeId),
    Vacant { parent: NodeId, left: bool },
}

/// An ordered container of unique keys, kept balanced with the red-black
/// discipline.
///
/// Elements of type `T` are ordered by the key `P` projects out of them,
/// using the comparator `C`. Nodes live in an arena owned by the tree and
/// are recycled through a free-list when elements are removed.
pub struct RedBlackTree<T, P, C = Natural> {
    pool: NodePool<T>,
    length: usize,
    comparator: C,
    hint_misses: usize,
    _policy: PhantomData<fn() -> P>,
}

impl<T, P, C: Default> RedBlackTree<T, P, C> {
    pub fn new() -> Self {
        Self::with_comparator(C::default())
    }

    /// Pre-allocates room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, C::default())
    }
}

impl<T, P, C: Default> Default for RedBlackTree<T, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, C> RedBlackTree<T, P, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            pool: NodePool::new(),
            length: 0,
            comparator,
            hint_misses: 0,
            _policy: PhantomData,
        }
    }

    pub fn with_capacity_and_comparator(
        capacity: usize,
        comparator: C,
    ) -> Self {
        Self {
            pool: NodePool::with_capacity(capacity),
            length: 0,
            comparator,
            hint_misses: 0,
            _policy: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Nodes the tree can hold before its arena has to grow.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Nodes ever taken from the allocator, live or recycled.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.pool.allocated()
    }

    /// Recycled nodes waiting to be reused by the next inserts.
    #[inline]
    pub fn pooled(&self) -> usize {
        self.pool.pooled()
    }

    /// How many hinted inserts had to fall back to a full descent.
    #[inline]
    pub fn hint_misses(&self) -> usize {
        self.hint_misses
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    #[inline]
    fn cursor(&self, id: NodeId) -> Cursor {
        Cursor {
            node: id,
            generation: self.pool.generation(id),
        }
    }

    fn resolve(&self, cursor: Cursor) -> Result<NodeId> {
        if cursor.is_end() {
            return Err(Error::EndCursor);
        }
        if !self.pool.contains(cursor.node)
            || self.pool.generation(cursor.node) != cursor.generation
            || self.pool.value(cursor.node).is_none()
        {
            return Err(Error::StaleCursor);
        }
        Ok(cursor.node)
    }

    /// Position of the smallest element, `end()` when empty.
    pub fn begin(&self) -> Cursor {
        let leftmost = self.pool.link(NodeId::HEADER).left;
        self.cursor(leftmost.unwrap_or(NodeId::HEADER))
    }

    #[inline]
    pub fn end(&self) -> Cursor {
        Cursor::END
    }

    /// Steps forward in order. The end position stays at the end, and so
    /// does a stale cursor.
    pub fn next(&self, cursor: Cursor) -> Cursor {
        match self.resolve(cursor) {
            Ok(id) => self.cursor(successor(&self.pool, id)),
            Err(_) => self.end(),
        }
    }

    /// Steps backward in order. Stepping back from `end()` lands on the
    /// largest element, stepping back from `begin()` lands on `end()`.
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        let id = if cursor.is_end() {
            NodeId::HEADER
        } else {
            match self.resolve(cursor) {
                Ok(id) => id,
                Err(_) => return self.end(),
            }
        };
        self.cursor(predecessor(&self.pool, id))
    }

    pub fn get(&self, cursor: Cursor) -> Option<&T> {
        self.resolve(cursor)
            .ok()
            .and_then(|id| self.pool.value(id))
    }

    /// Mutable access is kept inside the crate: changing the ordering key of
    /// a linked element would break the tree.
    pub(crate) fn value_mut(&mut self, cursor: Cursor) -> Option<&mut T> {
        let id = self.resolve(cursor).ok()?;
        self.pool.value_mut(id)
    }

    pub fn first(&self) -> Option<&T> {
        self.pool
            .link(NodeId::HEADER)
            .left
            .and_then(|id| self.pool.value(id))
    }

    pub fn last(&self) -> Option<&T> {
        self.pool
            .link(NodeId::HEADER)
            .right
            .and_then(|id| self.pool.value(id))
    }

    pub fn iter(&self) -> Iter<T> {
        let head = self.begin().node;
        Iter::new(&self.pool, head, NodeId::HEADER, self.length, true)
    }

    /// Iterates the half-open range `[first, last)`. A stale `first` yields
    /// nothing.
    pub fn range(&self, first: Cursor, last: Cursor) -> Iter<T> {
        let head = match self.resolve(first) {
            Ok(id) => id,
            Err(_) => NodeId::HEADER,
        };
        let tail = if last.is_end() || self.resolve(last).is_ok() {
            last.node
        } else {
            NodeId::HEADER
        };
        Iter::new(&self.pool, head, tail, self.length, false)
    }

    /// Recycles every node into the pool and empties the tree.
    pub fn clear(&mut self) {
        let root = self.pool.root();
        let released = self.pool.release_subtree(root);
        self.pool.reset_header();
        self.length = 0;
        trace!("Cleared {} nodes into the pool", released);
    }

    /// Exchanges the contents of two trees in O(1). Outstanding cursors
    /// follow their nodes into the other tree.
    pub fn swap(&mut self, other: &mut Self) {
        trace!(
            "Swapping trees of {} and {} elements",
            self.length,
            other.length
        );
        std::mem::swap(self, other);
    }

    fn remove_node(&mut self, id: NodeId) -> Option<T> {
        let removed = rebalance_for_erase(&mut self.pool, id);
        self.length -= 1;
        self.pool.release(removed)
    }

    /// Removes the element at `cursor`, recycling its node.
    pub fn remove(&mut self, cursor: Cursor) -> Result<T> {
        let id = self.resolve(cursor)?;
        self.remove_node(id).ok_or(Error::StaleCursor)
    }

    /// Removes the half-open range `[first, last)`, returning how many
    /// elements were removed. `last` must be reachable from `first`.
    pub fn remove_range(
        &mut self,
        first: Cursor,
        last: Cursor,
    ) -> Result<usize> {
        if !last.is_end() {
            self.resolve(last)?;
        }
        if first == self.begin() && last.is_end() {
            let removed = self.length;
            self.clear();
            return Ok(removed);
        }

        let mut removed = 0;
        let mut current = first;
        while current != last {
            let id = self.resolve(current)?;
            current = self.cursor(successor(&self.pool, id));
            self.remove_node(id);
            removed += 1;
        }
        Ok(removed)
    }
}

impl<T, P, C> RedBlackTree<T, P, C>
where
    P: KeyOf<T>,
    C: Compare<P::Key>,
{
    fn key(&self, id: NodeId) -> &P::Key {
        match self.pool.value(id) {
            Some(value) => P::key_of(value),
            None => panic!("{:?} is linked into the tree without a value", id),
        }
    }

    fn insert_position(&self, key: &P::Key) -> Position {
        let mut x = self.pool.root();
        let mut parent = NodeId::HEADER;
        let mut left = true;

        while let Some(node) = x {
            parent = node;
            let node_key = self.key(node);
            if self.comparator.less(key, node_key) {
                left = true;
                x = self.pool.link(node).left;
            } else if self.comparator.less(node_key, key) {
                left = false;
                x = self.pool.link(node).right;
            } else {
                return Position::Occupied(node);
            }
        }

        Position::Vacant { parent, left }
    }

    /// Where `key` goes if `hint` names the element right after it, `None`
    /// when the hint is wrong.
    fn hint_position(&self, hint: Cursor, key: &P::Key) -> Option<Position> {
        let header = *self.pool.link(NodeId::HEADER);

        if hint.is_end() {
            if self.length == 0 {
                return Some(Position::Vacant {
                    parent: NodeId::HEADER,
                    left: true,
                });
            }
            let max = header.right?;
            return self
                .comparator
                .less(self.key(max), key)
                .then_some(Position::Vacant {
                    parent: max,
                    left: false,
                });
        }

        let hint = self.resolve(hint).ok()?;
        let hint_key = self.key(hint);

        if self.comparator.less(key, hint_key) {
            if header.left == Some(hint) {
                return Some(Position::Vacant {
                    parent: hint,
                    left: true,
                });
            }
            let before = predecessor(&self.pool, hint);
            if !self.comparator.less(self.key(before), key) {
                return None;
            }
            Some(if self.pool.link(before).right.is_none() {
                Position::Vacant {
                    parent: before,
                    left: false,
                }
            } else {
                Position::Vacant {
                    parent: hint,
                    left: true,
                }
            })
        } else if self.comparator.less(hint_key, key) {
            if header.right == Some(hint) {
                return Some(Position::Vacant {
                    parent: hint,
                    left: false,
                });
            }
            let after = successor(&self.pool, hint);
            if !self.comparator.less(key, self.key(after)) {
                return None;
            }
            Some(if self.pool.link(hint).right.is_none() {
                Position::Vacant {
                    parent: hint,
                    left: false,
                }
            } else {
                Position::Vacant {
                    parent: after,
                    left: true,
                }
            })
        } else {
            Some(Position::Occupied(hint))
        }
    }

    fn link_new(
        &mut self,
        parent: NodeId,
        left: bool,
        value: T,
    ) -> Result<Cursor> {
        let id = self.pool.acquire(value)?;
        insert_and_rebalance(&mut self.pool, left, id, parent);
        self.length += 1;
        Ok(self.cursor(id))
    }

    /// Inserts `value` unless an element with an equivalent key exists.
    ///
    /// Returns the position of the element with that key and whether it was
    /// inserted. An existing element is never overwritten. On allocation
    /// failure the tree is left untouched.
    pub fn insert(&mut self, value: T) -> Result<(Cursor, bool)> {
        match self.insert_position(P::key_of(&value)) {
            Position::Occupied(id) => Ok((self.cursor(id), false)),
            Position::Vacant { parent, left } => {
                Ok((self.link_new(parent, left, value)?, true))
            }
        }
    }

    /// Inserts `value` in O(1) amortized when `hint` is the position right
    /// after where it belongs, otherwise falls back to [`Self::insert`].
    /// Misses are counted in [`Self::hint_misses`].
    pub fn insert_hint(&mut self, hint: Cursor, value: T) -> Result<Cursor> {
        match self.hint_position(hint, P::key_of(&value)) {
            Some(Position::Occupied(id)) => Ok(self.cursor(id)),
            Some(Position::Vacant { parent, left }) => {
                self.link_new(parent, left, value)
            }
            None => {
                self.hint_misses += 1;
                trace!(
                    "Insertion hint {:?} missed, doing a full descent",
                    hint
                );
                self.insert(value).map(|(cursor, _)| cursor)
            }
        }
    }

    /// Inserts every element of `iter`, returning how many were new.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let mut inserted = 0;
        for value in iter {
            if self.insert(value)?.1 {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Removes the element with an equivalent key, returning how many
    /// elements were removed (0 or 1).
    pub fn remove_key(&mut self, key: &P::Key) -> usize {
        let mut x = self.lower_bound_node(key);
        let last = self.upper_bound_node(key);
        let mut removed = 0;
        while x != last {
            let next = successor(&self.pool, x);
            self.remove_node(x);
            x = next;
            removed += 1;
        }
        removed
    }

    fn lower_bound_node(&self, key: &P::Key) -> NodeId {
        let mut x = self.pool.root();
        let mut y = NodeId::HEADER;
        while let Some(node) = x {
            let node_key = self.key(node);
            if self.comparator.less(key, node_key) {
                y = node;
                x = self.pool.link(node).left;
            } else if self.comparator.less(node_key, key) {
                x = self.pool.link(node).right;
            } else {
                return node;
            }
        }
        y
    }

    fn upper_bound_node(&self, key: &P::Key) -> NodeId {
        let mut x = self.pool.root();
        let mut y = NodeId::HEADER;
        while let Some(node) = x {
            if self.comparator.less(key, self.key(node)) {
                y = node;
                x = self.pool.link(node).left;
            } else {
                x = self.pool.link(node).right;
            }
        }
        y
    }

    /// First element not ordered before `key`.
    pub fn lower_bound(&self, key: &P::Key) -> Cursor {
        self.cursor(self.lower_bound_node(key))
    }

    /// First element ordered after `key`.
    pub fn upper_bound(&self, key: &P::Key) -> Cursor {
        self.cursor(self.upper_bound_node(key))
    }

    pub fn equal_range(&self, key: &P::Key) -> (Cursor, Cursor) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    pub fn find(&self, key: &P::Key) -> Cursor {
        let x = self.lower_bound_node(key);
        if x == NodeId::HEADER || self.comparator.less(key, self.key(x)) {
            self.end()
        } else {
            self.cursor(x)
        }
    }

    #[inline]
    pub fn contains(&self, key: &P::Key) -> bool {
        !self.find(key).is_end()
    }

    pub fn count(&self, key: &P::Key) -> usize {
        let (first, last) = self.equal_range(key);
        self.range(first, last).count()
    }

    /// Walks the whole tree verifying parent/child consistency, the
    /// red-black coloring rules, key order, the header's root, minimum and
    /// maximum caches and the element count. Returns the black-height.
    pub fn check(&self) -> Result<usize> {
        let corrupted = |message: String| Err(Error::Corrupted(message));
        let header = *self.pool.link(NodeId::HEADER);

        let Some(root) = header.parent else {
            if header.left != Some(NodeId::HEADER)
                || header.right != Some(NodeId::HEADER)
            {
                return corrupted(
                    "empty tree header does not point at itself".into(),
                );
            }
            if self.length != 0 {
                return corrupted(format!(
                    "empty tree reports {} elements",
                    self.length
                ));
            }
            return Ok(0);
        };

        if self.pool.link(root).color != Color::Black {
            return corrupted(format!("root {:?} is red", root));
        }
        if self.pool.link(root).parent != Some(NodeId::HEADER) {
            return corrupted(format!(
                "root {:?} is not a child of the header",
                root
            ));
        }
        if header.left != Some(minimum(&self.pool, root)) {
            return corrupted("header does not cache the minimum".into());
        }
        if header.right != Some(maximum(&self.pool, root)) {
            return corrupted("header does not cache the maximum".into());
        }

        // Post-order over an explicit stack, children's black-heights first.
        let mut heights = vec![0usize; self.pool.allocated() + 1];
        let mut visited = 0;
        let mut stack = vec![(root, false)];
        while let Some((id, children_done)) = stack.pop() {
            let link = *self.pool.link(id);
            if !children_done {
                visited += 1;
                if visited > self.length {
                    return corrupted("more linked nodes than elements".into());
                }
                if self.pool.value(id).is_none() {
                    return corrupted(format!(
                        "{:?} is linked without a value",
                        id
                    ));
                }
                for child in [link.left, link.right].into_iter().flatten() {
                    let child_link = self.pool.link(child);
                    if child_link.parent != Some(id) {
                        return corrupted(format!(
                            "{:?} does not point back at its parent {:?}",
                            child, id
                        ));
                    }
                    if link.color == Color::Red
                        && child_link.color == Color::Red
                    {
                        return corrupted(format!(
                            "red {:?} has a red child {:?}",
                            id, child
                        ));
                    }
                }
                stack.push((id, true));
                stack.extend(link.left.map(|left| (left, false)));
                stack.extend(link.right.map(|right| (right, false)));
                continue;
            }

            let left = link.left.map_or(0, |left| heights[left.index()]);
            let right = link.right.map_or(0, |right| heights[right.index()]);
            if left != right {
                return corrupted(format!(
                    "unequal black-heights {} and {} below {:?}",
                    left, right, id
                ));
            }
            let black = usize::from(link.color == Color::Black);
            heights[id.index()] = left + black;
        }
        if visited != self.length {
            return corrupted(format!(
                "{} linked nodes but {} elements",
                visited, self.length
            ));
        }

        let mut previous: Option<NodeId> = None;
        let mut x = minimum(&self.pool, root);
        while x != NodeId::HEADER {
            if let Some(previous) = previous {
                if !self.comparator.less(self.key(previous), self.key(x)) {
                    return corrupted(format!(
                        "{:?} is not ordered before {:?}",
                        previous, x
                    ));
                }
            }
            previous = Some(x);
            x = successor(&self.pool, x);
        }

        Ok(heights[root.index()])
    }
}

impl<T: Clone, P, C: Clone> RedBlackTree<T, P, C> {
    /// Deep copies the tree, preserving its shape and colors. The copy is
    /// built completely before it is returned, so a failed allocation leaves
    /// nothing half-built.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            pool: self.pool.try_copy(self.length)?,
            length: self.length,
            comparator: self.comparator.clone(),
            hint_misses: 0,
            _policy: PhantomData,
        })
    }
}

impl<T: Clone, P, C: Clone> Clone for RedBlackTree<T, P, C> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.copy(self.length),
            length: self.length,
            comparator: self.comparator.clone(),
            hint_misses: 0,
            _policy: PhantomData,
        }
    }
}

impl<T: Debug, P, C> Debug for RedBlackTree<T, P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, P, C> PartialEq for RedBlackTree<T, P, C> {
    fn eq(&self, other: &RedBlackTree<T, P, C>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, P, C> Eq for RedBlackTree<T, P, C> {}

impl<T: PartialOrd, P, C> PartialOrd for RedBlackTree<T, P, C> {
    fn partial_cmp(&self, other: &RedBlackTree<T, P, C>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, P, C> Ord for RedBlackTree<T, P, C> {
    fn cmp(&self, other: &RedBlackTree<T, P, C>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T, P, C> Extend<T> for RedBlackTree<T, P, C>
where
    P: KeyOf<T>,
    C: Compare<P::Key>,
{
    /// Panics if a node cannot be allocated, use [`RedBlackTree::try_extend`]
    /// to handle that.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Err(e) = self.try_extend(iter) {
            panic!("failed to extend tree: {}", e);
        }
    }
}

impl<T, P, C> FromIterator<T> for RedBlackTree<T, P, C>
where
    P: KeyOf<T>,
    C: Compare<P::Key> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, P, C> IntoIterator for RedBlackTree<T, P, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let head = self.begin().node;
        IntoIter::new(self.pool, head, self.length)
    }
}

impl<'a, T, P, C> IntoIterator for &'a RedBlackTree<T, P, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
