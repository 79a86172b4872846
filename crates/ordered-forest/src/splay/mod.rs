//! Splay (move-to-root) strategy.
//!
//! No metadata is kept. Every access, insertion and removal splays the
//! touched node to the root with zig / zig-zig / zig-zag steps built from
//! [`rotate`].

use tracing::trace;

use crate::balance::{Balance, Change};
use crate::tree_node::TreeNode;
use crate::types::Node;
use crate::util::{get_l, get_p, get_r, last, rotate, set_l, set_p, set_r};

/// Splays `x` to the top of the tree containing it.
///
/// ```text
/// zig:        p          x
///            /     →      \
///           x              p
///
/// zig-zig:      g        x
///              /          \
///             p     →      p
///            /              \
///           x                g
///
/// zig-zag:    g          x
///            /          / \
///           p     →    p   g
///            \
///             x
/// ```
///
/// Returns the new root (which is `x`).
pub fn splay<N: Node>(arena: &mut [N], mut root: Option<u32>, x: u32) -> Option<u32> {
    while let Some(p) = get_p(arena, x) {
        match get_p(arena, p) {
            None => {
                trace!(node = x, "splay zig");
                root = rotate(arena, root, x);
            }
            Some(g) => {
                let zig_zig = (get_l(arena, p) == Some(x)) == (get_l(arena, g) == Some(p));
                if zig_zig {
                    trace!(node = x, "splay zig-zig");
                    root = rotate(arena, root, p);
                } else {
                    trace!(node = x, "splay zig-zag");
                    root = rotate(arena, root, x);
                }
                root = rotate(arena, root, x);
            }
        }
    }
    root
}

/// Splays the most recently touched node to the root.
#[derive(Clone, Copy, Debug, Default)]
pub struct Splay;

impl Balance for Splay {
    type Meta = ();

    const NAME: &'static str = "SplayTreeMap";

    fn rebalance<K, V>(
        arena: &mut [TreeNode<K, V, ()>],
        root: Option<u32>,
        change: Change<()>,
    ) -> Option<u32> {
        match change {
            Change::Inserted(node) | Change::Accessed(node) => splay(arena, root, node),
            // Removal runs entirely in `detach`, which never reports back.
            Change::Removed { .. } => root,
        }
    }

    /// Splays `node` to the root and removes it there.
    ///
    /// With two children the left subtree is cut off, its maximum is splayed
    /// to the top of it (leaving that node without a right child), and the
    /// original right subtree is hung off the maximum.
    fn detach<K, V>(
        arena: &mut [TreeNode<K, V, ()>],
        root: Option<u32>,
        node: u32,
    ) -> (Option<u32>, u32) {
        splay(arena, root, node);
        let l = get_l(arena, node);
        let r = get_r(arena, node);
        set_l(arena, node, None);
        set_r(arena, node, None);
        if let Some(l) = l {
            set_p(arena, l, None);
        }
        if let Some(r) = r {
            set_p(arena, r, None);
        }

        let root = match (l, r) {
            (None, r) => r,
            (l, None) => l,
            (Some(l), Some(r)) => {
                let max = last(arena, Some(l)).unwrap_or(l);
                trace!(removed = node, predecessor = max, "splay join");
                let top = splay(arena, Some(l), max);
                set_r(arena, max, Some(r));
                set_p(arena, r, Some(max));
                top
            }
        };
        (root, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::util::{assert_search_tree, in_order};

    fn cmp_i32(a: &i32, b: &i32) -> i32 {
        a.cmp(b) as i32
    }

    // Left spine 40 <- 30 <- 20 <- 10 (slot i holds (4 - i) * 10).
    fn spine() -> (Vec<TreeNode<i32, (), ()>>, Option<u32>) {
        let mut arena: Vec<_> = (0..4)
            .map(|i| TreeNode::new(Entry::new((4 - i) * 10, ()), ()))
            .collect();
        for i in 0..3u32 {
            set_l(&mut arena, i, Some(i + 1));
            set_p(&mut arena, i + 1, Some(i));
        }
        (arena, Some(0))
    }

    #[test]
    fn splay_deepest_node_of_spine() {
        let (mut arena, root) = spine();
        let root = splay(&mut arena, root, 3);
        assert_eq!(root, Some(3));
        assert_eq!(get_p(&arena, 3), None);
        assert_eq!(in_order(&arena, root), vec![3, 2, 1, 0]);
        assert_eq!(assert_search_tree(&arena, root, &cmp_i32), Ok(4));
    }

    #[test]
    fn detach_root_with_two_children_joins_at_predecessor() {
        let (mut arena, root) = spine();
        // 20 as root: left 10, right 30 <- ... after splaying slot 2.
        let root = splay(&mut arena, root, 2);
        assert_eq!(root, Some(2));
        let (root, slot) = Splay::detach(&mut arena, root, 2);
        assert_eq!(slot, 2);
        assert_eq!(root, Some(3));
        assert_eq!(get_r(&arena, 3), Some(1));
        assert_eq!(assert_search_tree(&arena, root, &cmp_i32), Ok(3));
    }

    #[test]
    fn removed_change_keeps_root() {
        let (mut arena, root) = spine();
        let change = Change::Removed {
            parent: Some(2),
            left: true,
            child: None,
            meta: (),
        };
        assert_eq!(Splay::rebalance(&mut arena, root, change), root);
        assert_eq!(in_order(&arena, root), vec![3, 2, 1, 0]);
    }
}
