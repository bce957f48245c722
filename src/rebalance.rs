use crate::{
    links::{maximum, minimum, replace_child, rotate_left, rotate_right},
    node::{Color, LinkArena, NodeId},
};

/// Links the detached node `x` as the left or right child of `p` (the header
/// when the tree is empty), keeps the header's root, minimum and maximum
/// caches current, then recolors and rotates until no red node has a red
/// parent.
pub(crate) fn insert_and_rebalance<A: LinkArena + ?Sized>(
    arena: &mut A,
    insert_left: bool,
    x: NodeId,
    p: NodeId,
) {
    {
        let link = arena.link_mut(x);
        link.parent = Some(p);
        link.left = None;
        link.right = None;
        link.color = Color::Red;
    }

    if insert_left {
        // Linking left of the header also sets the header's minimum.
        arena.link_mut(p).left = Some(x);
        if p == NodeId::HEADER {
            let header = arena.link_mut(NodeId::HEADER);
            header.parent = Some(x);
            header.right = Some(x);
        } else if arena.link(NodeId::HEADER).left == Some(p) {
            arena.link_mut(NodeId::HEADER).left = Some(x);
        }
    } else {
        arena.link_mut(p).right = Some(x);
        if arena.link(NodeId::HEADER).right == Some(p) {
            arena.link_mut(NodeId::HEADER).right = Some(x);
        }
    }

    let mut x = x;
    while arena.root() != Some(x) && arena.is_red(Some(arena.parent_of(x))) {
        let xp = arena.parent_of(x);
        let xpp = arena.parent_of(xp);

        if arena.link(xpp).left == Some(xp) {
            let uncle = arena.link(xpp).right;
            if let Some(uncle) = uncle.filter(|&u| arena.is_red(Some(u))) {
                arena.set_color(uncle, Color::Black);
                arena.set_color(xp, Color::Black);
                arena.set_color(xpp, Color::Red);
                x = xpp;
            } else {
                if arena.link(xp).right == Some(x) {
                    x = xp;
                    rotate_left(arena, x);
                }
                let xp = arena.parent_of(x);
                arena.set_color(xp, Color::Black);
                arena.set_color(xpp, Color::Red);
                rotate_right(arena, xpp);
            }
        } else {
            let uncle = arena.link(xpp).left;
            if let Some(uncle) = uncle.filter(|&u| arena.is_red(Some(u))) {
                arena.set_color(uncle, Color::Black);
                arena.set_color(xp, Color::Black);
                arena.set_color(xpp, Color::Red);
                x = xpp;
            } else {
                if arena.link(xp).left == Some(x) {
                    x = xp;
                    rotate_right(arena, x);
                }
                let xp = arena.parent_of(x);
                arena.set_color(xp, Color::Black);
                arena.set_color(xpp, Color::Red);
                rotate_left(arena, xpp);
            }
        }
    }

    if let Some(root) = arena.root() {
        arena.set_color(root, Color::Black);
    }
}

/// Unlinks `z` from the tree and restores the red-black invariants.
///
/// When `z` has two children its in-order successor is moved into `z`'s
/// position (taking over `z`'s color) instead of moving payloads, so every
/// other node keeps its identity. The returned node is always `z`, now
/// detached and ready to be recycled.
pub(crate) fn rebalance_for_erase<A: LinkArena + ?Sized>(
    arena: &mut A,
    z: NodeId,
) -> NodeId {
    let z_link = *arena.link(z);

    // y is the node that physically leaves its position, x the subtree that
    // takes its place.
    let (y, mut x) = match (z_link.left, z_link.right) {
        (None, right) => (z, right),
        (left, None) => (z, left),
        (Some(_), Some(right)) => {
            let y = minimum(arena, right);
            (y, arena.link(y).right)
        }
    };
    let mut x_parent;

    if y != z {
        if let Some(z_left) = z_link.left {
            arena.link_mut(z_left).parent = Some(y);
        }
        arena.link_mut(y).left = z_link.left;

        if Some(y) != z_link.right {
            x_parent = arena.parent_of(y);
            if let Some(x) = x {
                arena.link_mut(x).parent = Some(x_parent);
            }
            arena.link_mut(x_parent).left = x;
            arena.link_mut(y).right = z_link.right;
            if let Some(z_right) = z_link.right {
                arena.link_mut(z_right).parent = Some(y);
            }
        } else {
            x_parent = y;
        }

        replace_child(arena, z, Some(y));
        arena.link_mut(y).parent = z_link.parent;

        let y_color = arena.link(y).color;
        arena.set_color(y, z_link.color);
        arena.set_color(z, y_color);
    } else {
        x_parent = arena.parent_of(z);
        if let Some(x) = x {
            arena.link_mut(x).parent = Some(x_parent);
        }
        replace_child(arena, z, x);

        // z had at most one child, so it may have been an extreme.
        if arena.link(NodeId::HEADER).left == Some(z) {
            let leftmost = match (z_link.right, x) {
                (Some(_), Some(x)) => minimum(arena, x),
                _ => x_parent,
            };
            arena.link_mut(NodeId::HEADER).left = Some(leftmost);
        }
        if arena.link(NodeId::HEADER).right == Some(z) {
            let rightmost = match (z_link.left, x) {
                (Some(_), Some(x)) => maximum(arena, x),
                _ => x_parent,
            };
            arena.link_mut(NodeId::HEADER).right = Some(rightmost);
        }
    }

    if arena.link(z).color == Color::Black {
        while x != arena.root() && !arena.is_red(x) {
            if arena.link(x_parent).left == x {
                let Some(mut w) = arena.link(x_parent).right else {
                    break;
                };
                if arena.is_red(Some(w)) {
                    arena.set_color(w, Color::Black);
                    arena.set_color(x_parent, Color::Red);
                    rotate_left(arena, x_parent);
                    let Some(sibling) = arena.link(x_parent).right else {
                        break;
                    };
                    w = sibling;
                }

                let w_link = *arena.link(w);
                if !arena.is_red(w_link.left) && !arena.is_red(w_link.right) {
                    arena.set_color(w, Color::Red);
                    x = Some(x_parent);
                    x_parent = arena.parent_of(x_parent);
                } else {
                    if !arena.is_red(w_link.right) {
                        if let Some(near) = w_link.left {
                            arena.set_color(near, Color::Black);
                        }
                        arena.set_color(w, Color::Red);
                        rotate_right(arena, w);
                        let Some(sibling) = arena.link(x_parent).right else {
                            break;
                        };
                        w = sibling;
                    }
                    let parent_color = arena.link(x_parent).color;
                    arena.set_color(w, parent_color);
                    arena.set_color(x_parent, Color::Black);
                    if let Some(far) = arena.link(w).right {
                        arena.set_color(far, Color::Black);
                    }
                    rotate_left(arena, x_parent);
                    break;
                }
            } else {
                let Some(mut w) = arena.link(x_parent).left else {
                    break;
                };
                if arena.is_red(Some(w)) {
                    arena.set_color(w, Color::Black);
                    arena.set_color(x_parent, Color::Red);
                    rotate_right(arena, x_parent);
                    let Some(sibling) = arena.link(x_parent).left else {
                        break;
                    };
                    w = sibling;
                }

                let w_link = *arena.link(w);
                if !arena.is_red(w_link.left) && !arena.is_red(w_link.right) {
                    arena.set_color(w, Color::Red);
                    x = Some(x_parent);
                    x_parent = arena.parent_of(x_parent);
                } else {
                    if !arena.is_red(w_link.left) {
                        if let Some(near) = w_link.right {
                            arena.set_color(near, Color::Black);
                        }
                        arena.set_color(w, Color::Red);
                        rotate_left(arena, w);
                        let Some(sibling) = arena.link(x_parent).left else {
                            break;
                        };
                        w = sibling;
                    }
                    let parent_color = arena.link(x_parent).color;
                    arena.set_color(w, parent_color);
                    arena.set_color(x_parent, Color::Black);
                    if let Some(far) = arena.link(w).left {
                        arena.set_color(far, Color::Black);
                    }
                    rotate_right(arena, x_parent);
                    break;
                }
            }
        }
        if let Some(x) = x {
            arena.set_color(x, Color::Black);
        }
    }

    z
}
