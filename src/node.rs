use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Index of a node slot inside a tree's arena.
///
/// Slot 0 always holds the header: the root's parent, the `end()` position,
/// and the cache of the minimum and maximum nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const HEADER: NodeId = NodeId(0);

    /// Largest number of slots (header included) an arena can address.
    pub const MAX_SLOTS: usize = u32::MAX as usize;

    #[inline]
    pub(crate) fn from_index(index: usize) -> Option<NodeId> {
        if index < Self::MAX_SLOTS {
            Some(NodeId(index as u32))
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if *self == NodeId::HEADER {
            write!(f, "NodeId(header)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// The structural half of a node: everything rotations and fixups touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub color: Color,
}

impl Link {
    pub(crate) fn detached(color: Color) -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            color,
        }
    }

    /// The header of an empty tree: no root, minimum and maximum point back
    /// at the header itself.
    pub(crate) fn empty_header() -> Self {
        Self {
            parent: None,
            left: Some(NodeId::HEADER),
            right: Some(NodeId::HEADER),
            color: Color::Red,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) link: Link,
    /// Bumped every time the slot is recycled, so cursors into a previous
    /// occupant are detected.
    pub(crate) generation: u32,
    pub(crate) value: Option<T>,
}

impl<T> Node<T> {
    pub(crate) fn header() -> Self {
        Self {
            link: Link::empty_header(),
            generation: 0,
            value: None,
        }
    }

    pub(crate) fn new(value: T) -> Self {
        Self {
            link: Link::detached(Color::Red),
            generation: 0,
            value: Some(value),
        }
    }
}

/// Storage that can resolve a [`NodeId`] to its links.
///
/// Link and rebalancing algorithms are written against this trait only, so
/// they stay oblivious to the payload type.
pub trait LinkArena {
    fn link(&self, id: NodeId) -> &Link;
    fn link_mut(&mut self, id: NodeId) -> &mut Link;

    #[inline]
    fn root(&self) -> Option<NodeId> {
        self.link(NodeId::HEADER).parent
    }

    #[inline]
    fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.link(id).color)
    }

    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        self.color_of(id) == Color::Red
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        self.link_mut(id).color = color;
    }

    /// Parent of a linked node. The root's parent is the header.
    #[inline]
    fn parent_of(&self, id: NodeId) -> NodeId {
        self.link(id).parent.unwrap_or(NodeId::HEADER)
    }
}

#[cfg(test)]
impl LinkArena for Vec<Link> {
    fn link(&self, id: NodeId) -> &Link {
        &self[id.index()]
    }

    fn link_mut(&mut self, id: NodeId) -> &mut Link {
        &mut self[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_links_are_black() {
        let arena = vec![Link::empty_header()];
        assert_eq!(arena.color_of(None), Color::Black);
        assert!(!arena.is_red(None));
        assert!(arena.is_red(Some(NodeId::HEADER)));
    }

    #[test]
    fn empty_header_points_at_itself() {
        let arena = vec![Link::empty_header()];
        assert_eq!(arena.root(), None);
        assert_eq!(arena.link(NodeId::HEADER).left, Some(NodeId::HEADER));
        assert_eq!(arena.link(NodeId::HEADER).right, Some(NodeId::HEADER));
    }

    #[test]
    fn node_id_bounds() {
        assert_eq!(NodeId::from_index(7).map(NodeId::index), Some(7));
        assert!(NodeId::from_index(NodeId::MAX_SLOTS).is_none());
    }
}
