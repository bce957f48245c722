use crate::node::{LinkArena, NodeId};

pub(crate) fn minimum<A: LinkArena + ?Sized>(
    arena: &A,
    mut x: NodeId,
) -> NodeId {
    while let Some(left) = arena.link(x).left {
        x = left;
    }
    x
}

pub(crate) fn maximum<A: LinkArena + ?Sized>(
    arena: &A,
    mut x: NodeId,
) -> NodeId {
    while let Some(right) = arena.link(x).right {
        x = right;
    }
    x
}

/// In-order successor. The maximum's successor is the header, and the header
/// is its own successor.
pub(crate) fn successor<A: LinkArena + ?Sized>(
    arena: &A,
    mut x: NodeId,
) -> NodeId {
    if x == NodeId::HEADER {
        return x;
    }

    if let Some(right) = arena.link(x).right {
        return minimum(arena, right);
    }

    loop {
        let parent = arena.parent_of(x);
        if parent == NodeId::HEADER || arena.link(parent).left == Some(x) {
            return parent;
        }
        x = parent;
    }
}

/// In-order predecessor. Stepping back from the header lands on the cached
/// maximum, stepping back from the minimum lands on the header.
pub(crate) fn predecessor<A: LinkArena + ?Sized>(
    arena: &A,
    mut x: NodeId,
) -> NodeId {
    if x == NodeId::HEADER {
        return arena.link(x).right.unwrap_or(NodeId::HEADER);
    }

    if let Some(left) = arena.link(x).left {
        return maximum(arena, left);
    }

    loop {
        let parent = arena.parent_of(x);
        if parent == NodeId::HEADER || arena.link(parent).right == Some(x) {
            return parent;
        }
        x = parent;
    }
}

/// Points whatever referenced `old` as a child (or the header, when `old` is
/// the root) at `new` instead.
pub(crate) fn replace_child<A: LinkArena + ?Sized>(
    arena: &mut A,
    old: NodeId,
    new: Option<NodeId>,
) {
    if arena.root() == Some(old) {
        arena.link_mut(NodeId::HEADER).parent = new;
        return;
    }

    let parent = arena.parent_of(old);
    let parent_link = arena.link_mut(parent);
    if parent_link.left == Some(old) {
        parent_link.left = new;
    } else {
        parent_link.right = new;
    }
}

pub(crate) fn rotate_left<A: LinkArena + ?Sized>(arena: &mut A, x: NodeId) {
    let Some(y) = arena.link(x).right else {
        return;
    };

    let y_left = arena.link(y).left;
    arena.link_mut(x).right = y_left;
    if let Some(y_left) = y_left {
        arena.link_mut(y_left).parent = Some(x);
    }

    // Must run before x's parent link moves.
    replace_child(arena, x, Some(y));
    let x_parent = arena.link(x).parent;
    arena.link_mut(y).parent = x_parent;

    arena.link_mut(y).left = Some(x);
    arena.link_mut(x).parent = Some(y);
}

pub(crate) fn rotate_right<A: LinkArena + ?Sized>(arena: &mut A, x: NodeId) {
    let Some(y) = arena.link(x).left else {
        return;
    };

    let y_right = arena.link(y).right;
    arena.link_mut(x).left = y_right;
    if let Some(y_right) = y_right {
        arena.link_mut(y_right).parent = Some(x);
    }

    replace_child(arena, x, Some(y));
    let x_parent = arena.link(x).parent;
    arena.link_mut(y).parent = x_parent;

    arena.link_mut(y).right = Some(x);
    arena.link_mut(x).parent = Some(y);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::node::{Color, Link};

    /// Builds a link arena from `(id, parent, left, right)` rows, with the
    /// header at slot 0 already wired to `root`.
    pub(crate) fn arena(
        root: usize,
        rows: &[(usize, usize, Option<usize>, Option<usize>)],
    ) -> Vec<Link> {
        let id = |i: usize| NodeId::from_index(i).unwrap();
        let mut links = vec![Link::empty_header(); rows.len() + 1];
        for &(i, parent, left, right) in rows {
            links[i] = Link {
                parent: Some(id(parent)),
                left: left.map(id),
                right: right.map(id),
                color: Color::Black,
            };
        }
        links[0].parent = Some(id(root));
        let min = minimum(&links, id(root));
        let max = maximum(&links, id(root));
        links[0].left = Some(min);
        links[0].right = Some(max);
        links
    }

    fn id(i: usize) -> NodeId {
        NodeId::from_index(i).unwrap()
    }

    //       2
    //     /   \
    //    1     4
    //         / \
    //        3   5
    fn sample() -> Vec<Link> {
        arena(
            2,
            &[
                (1, 2, None, None),
                (2, 0, Some(1), Some(4)),
                (3, 4, None, None),
                (4, 2, Some(3), Some(5)),
                (5, 4, None, None),
            ],
        )
    }

    fn in_order(links: &Vec<Link>) -> Vec<usize> {
        let mut result = Vec::new();
        let mut x = links[0].left.unwrap();
        while x != NodeId::HEADER {
            result.push(x.index());
            x = successor(links, x);
        }
        result
    }

    #[test]
    fn min_max() {
        let links = sample();
        assert_eq!(minimum(&links, id(2)), id(1));
        assert_eq!(maximum(&links, id(2)), id(5));
        assert_eq!(minimum(&links, id(4)), id(3));
    }

    #[test]
    fn successor_walks_in_order() {
        let links = sample();
        assert_eq!(in_order(&links), vec![1, 2, 3, 4, 5]);
        assert_eq!(successor(&links, id(5)), NodeId::HEADER);
        assert_eq!(successor(&links, NodeId::HEADER), NodeId::HEADER);
    }

    #[test]
    fn predecessor_walks_backwards_from_end() {
        let links = sample();
        let mut x = NodeId::HEADER;
        let mut result = Vec::new();
        loop {
            x = predecessor(&links, x);
            if x == NodeId::HEADER {
                break;
            }
            result.push(x.index());
        }
        assert_eq!(result, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn root_as_maximum_has_header_successor() {
        let links = arena(2, &[(1, 2, None, None), (2, 0, Some(1), None)]);
        assert_eq!(successor(&links, id(2)), NodeId::HEADER);
        assert_eq!(predecessor(&links, NodeId::HEADER), id(2));
    }

    #[test]
    fn rotate_left_at_root() {
        let mut links = sample();
        rotate_left(&mut links, id(2));

        assert_eq!(links.root(), Some(id(4)));
        assert_eq!(links[4].parent, Some(NodeId::HEADER));
        assert_eq!(links[4].left, Some(id(2)));
        assert_eq!(links[2].parent, Some(id(4)));
        assert_eq!(links[2].right, Some(id(3)));
        assert_eq!(links[3].parent, Some(id(2)));
        assert_eq!(in_order(&links), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn rotate_right_below_root() {
        let mut links = sample();
        rotate_right(&mut links, id(4));

        assert_eq!(links.root(), Some(id(2)));
        assert_eq!(links[2].right, Some(id(3)));
        assert_eq!(links[3].parent, Some(id(2)));
        assert_eq!(links[3].right, Some(id(4)));
        assert_eq!(links[4].left, None);
        assert_eq!(in_order(&links), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn rotations_are_inverse() {
        let mut links = sample();
        rotate_left(&mut links, id(2));
        rotate_right(&mut links, id(4));
        assert_eq!(links, sample());
    }

    #[test]
    fn rotate_without_child_is_a_no_op() {
        let mut links = sample();
        rotate_left(&mut links, id(1));
        rotate_right(&mut links, id(5));
        assert_eq!(links, sample());
    }
}
