use log::trace;

use crate::{
    error::{Error, Result},
    links::{maximum, minimum},
    node::{Color, Link, LinkArena, Node, NodeId},
};

/// Owns every node of a tree: slot 0 is the header, the rest are either
/// linked into the tree or waiting on the free-list for reuse.
///
/// Recycled nodes are chained through their `parent` link. Slots are only
/// returned to the allocator when the pool itself is dropped.
#[derive(Debug)]
pub(crate) struct NodePool<T> {
    nodes: Vec<Node<T>>,
    free_head: Option<NodeId>,
    pooled: usize,
}

impl<T> NodePool<T> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::header()],
            free_head: None,
            pooled: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(Node::header());
        Self {
            nodes,
            free_head: None,
            pooled: 0,
        }
    }

    /// Nodes ever handed out by the backing allocator.
    #[inline]
    pub(crate) fn allocated(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Nodes sitting on the free-list.
    #[inline]
    pub(crate) fn pooled(&self) -> usize {
        self.pooled
    }

    /// Nodes the arena can hold before it has to grow.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity() - 1
    }

    /// Takes a node off the free-list, or allocates a fresh one, and stores
    /// `value` in it. The node comes back detached.
    pub(crate) fn acquire(&mut self, value: T) -> Result<NodeId> {
        if let Some(id) = self.free_head {
            let node = &mut self.nodes[id.index()];
            self.free_head = node.link.parent;
            self.pooled -= 1;
            node.link = Link::detached(Color::Red);
            node.value = Some(value);
            return Ok(id);
        }

        let id = NodeId::from_index(self.nodes.len())
            .ok_or(Error::CapacityOverflow(NodeId::MAX_SLOTS - 1))?;
        if self.nodes.len() == self.nodes.capacity() {
            trace!("Growing node pool past {} nodes", self.capacity());
            self.nodes.try_reserve(1)?;
        }
        self.nodes.push(Node::new(value));
        Ok(id)
    }

    /// Destroys the payload of a detached node and pushes the node on the
    /// free-list.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<T> {
        let free_head = self.free_head;
        let node = &mut self.nodes[id.index()];
        let value = node.value.take();
        node.generation = node.generation.wrapping_add(1);
        node.link = Link {
            parent: free_head,
            left: None,
            right: None,
            color: Color::Black,
        };
        self.free_head = Some(id);
        self.pooled += 1;
        value
    }

    /// Releases every node of the subtree rooted at `root`, returning how
    /// many were released. Child links are read before a node is released.
    pub(crate) fn release_subtree(&mut self, root: Option<NodeId>) -> usize {
        let mut released = 0;
        let mut stack: Vec<NodeId> = root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let link = self.nodes[id.index()].link;
            stack.extend(link.left);
            stack.extend(link.right);
            self.release(id);
            released += 1;
        }
        released
    }

    pub(crate) fn reset_header(&mut self) {
        self.nodes[NodeId::HEADER.index()].link = Link::empty_header();
    }

    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[inline]
    pub(crate) fn generation(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].generation
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.index()).and_then(|node| node.value.as_ref())
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes
            .get_mut(id.index())
            .and_then(|node| node.value.as_mut())
    }

    /// Moves a payload out without touching links, so in-order walks over
    /// the remaining nodes keep working.
    #[inline]
    pub(crate) fn take_value(&mut self, id: NodeId) -> Option<T> {
        self.nodes
            .get_mut(id.index())
            .and_then(|node| node.value.take())
    }
}

impl<T: Clone> NodePool<T> {
    /// Deep copies the linked tree (shape and colors) into a new, compact
    /// pool. The free-list is not carried over.
    pub(crate) fn try_copy(&self, live: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(live + 1)?;
        Ok(self.copy_into(nodes))
    }

    pub(crate) fn copy(&self, live: usize) -> Self {
        self.copy_into(Vec::with_capacity(live + 1))
    }

    fn copy_into(&self, mut nodes: Vec<Node<T>>) -> Self {
        enum Side {
            Root,
            Left,
            Right,
        }

        nodes.push(Node::header());
        let mut stack: Vec<(NodeId, NodeId, Side)> = Vec::new();
        if let Some(root) = self.root() {
            stack.push((root, NodeId::HEADER, Side::Root));
        }

        // Pre-order: a parent is always copied before its children.
        while let Some((source, parent, side)) = stack.pop() {
            let source_node = &self.nodes[source.index()];
            let Some(id) = NodeId::from_index(nodes.len()) else {
                break;
            };
            nodes.push(Node {
                link: Link {
                    parent: Some(parent),
                    left: None,
                    right: None,
                    color: source_node.link.color,
                },
                generation: 0,
                value: source_node.value.clone(),
            });

            let parent_link = &mut nodes[parent.index()].link;
            match side {
                Side::Root => parent_link.parent = Some(id),
                Side::Left => parent_link.left = Some(id),
                Side::Right => parent_link.right = Some(id),
            }

            if let Some(right) = source_node.link.right {
                stack.push((right, id, Side::Right));
            }
            if let Some(left) = source_node.link.left {
                stack.push((left, id, Side::Left));
            }
        }

        let mut pool = Self {
            nodes,
            free_head: None,
            pooled: 0,
        };
        if let Some(root) = pool.root() {
            let min = minimum(&pool, root);
            let max = maximum(&pool, root);
            let header = pool.link_mut(NodeId::HEADER);
            header.left = Some(min);
            header.right = Some(max);
        }
        pool
    }
}

impl<T> LinkArena for NodePool<T> {
    #[inline]
    fn link(&self, id: NodeId) -> &Link {
        &self.nodes[id.index()].link
    }

    #[inline]
    fn link_mut(&mut self, id: NodeId) -> &mut Link {
        &mut self.nodes[id.index()].link
    }
}
