use crate::{
    links::{predecessor, successor},
    node::NodeId,
    pool::NodePool,
};

/// A position inside a tree: either an element or the end position.
///
/// Cursors are plain handles and never borrow the tree. Removing the element
/// a cursor points at makes it stale, which lookups through the tree detect
/// and report. A cursor only names a node, never the tree owning it, so
/// swapping two trees carries their cursors along with their nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub(crate) node: NodeId,
    pub(crate) generation: u32,
}

impl Cursor {
    pub(crate) const END: Cursor = Cursor {
        node: NodeId::HEADER,
        generation: 0,
    };

    #[inline]
    pub fn is_end(&self) -> bool {
        self.node == NodeId::HEADER
    }
}

/// Borrowing in-order iterator. Iterate it with `.rev()` for descending
/// order.
pub struct Iter<'a, T: 'a> {
    pool: &'a NodePool<T>,
    head: NodeId,
    tail: NodeId,
    length: usize,
    exact: bool,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(
        pool: &'a NodePool<T>,
        head: NodeId,
        tail: NodeId,
        length: usize,
        exact: bool,
    ) -> Self {
        Self {
            pool,
            head,
            tail,
            length,
            exact,
        }
    }
}

impl<'a, T: 'a> Clone for Iter<'a, T> {
    fn clone(&self) -> Iter<'a, T> {
        Iter {
            pool: self.pool,
            head: self.head,
            tail: self.tail,
            length: self.length,
            exact: self.exact,
        }
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        // The head only reaches the end past an inverted range's tail.
        if self.length == 0
            || self.head == self.tail
            || self.head == NodeId::HEADER
        {
            return None;
        }

        let node = self.head;
        self.head = successor(self.pool, node);
        self.length -= 1;
        self.pool.value(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower = if self.exact { self.length } else { 0 };
        (lower, Some(self.length))
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.length == 0
            || self.head == self.tail
            || self.head == NodeId::HEADER
        {
            return None;
        }

        let tail = predecessor(self.pool, self.tail);
        if tail == NodeId::HEADER {
            self.length = 0;
            return None;
        }
        self.tail = tail;
        self.length -= 1;
        self.pool.value(self.tail)
    }
}

/// Consuming in-order iterator.
///
/// Payloads are moved out one by one while the links stay untouched, so the
/// walk never reads a recycled node. Whatever is left is dropped along with
/// the pool.
pub struct IntoIter<T> {
    pool: NodePool<T>,
    head: NodeId,
    tail: NodeId,
    length: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(pool: NodePool<T>, head: NodeId, length: usize) -> Self {
        Self {
            pool,
            head,
            tail: NodeId::HEADER,
            length,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.length == 0 || self.head == self.tail {
            return None;
        }

        let node = self.head;
        self.head = successor(&self.pool, node);
        self.length -= 1;
        self.pool.take_value(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.length, Some(self.length))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.length == 0 || self.head == self.tail {
            return None;
        }

        self.tail = predecessor(&self.pool, self.tail);
        self.length -= 1;
        self.pool.take_value(self.tail)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
