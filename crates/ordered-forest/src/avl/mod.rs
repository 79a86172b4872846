//! AVL (height-balanced) strategy.

pub mod util;

use crate::balance::{Balance, Change};
use crate::tree_node::TreeNode;

/// Keeps `|height(left) - height(right)| <= 1` at every node.
///
/// Node metadata is the cached subtree height; a fresh leaf has height 0 and
/// a missing child counts as -1.
#[derive(Clone, Copy, Debug, Default)]
pub struct Avl;

impl Balance for Avl {
    type Meta = i32;

    const NAME: &'static str = "AvlTreeMap";

    fn rebalance<K, V>(
        arena: &mut [TreeNode<K, V, i32>],
        root: Option<u32>,
        change: Change<i32>,
    ) -> Option<u32> {
        match change {
            Change::Inserted(node) => util::rebalance(arena, root, Some(node)),
            Change::Removed { parent, .. } => util::rebalance(arena, root, parent),
            Change::Accessed(_) => root,
        }
    }

    fn annotate(meta: &i32) -> Option<String> {
        Some(format!("h={meta}"))
    }

    fn assert_balanced<K, V>(
        arena: &[TreeNode<K, V, i32>],
        root: Option<u32>,
    ) -> Result<(), String> {
        util::assert_avl_tree(arena, root).map(|_| ())
    }
}
