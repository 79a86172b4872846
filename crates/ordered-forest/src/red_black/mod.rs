//! Red-black (color-balanced) strategy.

pub mod util;

use std::fmt;

use crate::balance::{Balance, Change};
use crate::tree_node::TreeNode;

/// Node color. Fresh leaves are red; missing children count as black.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Color {
    #[default]
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => f.write_str("red"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// Keeps the root black, forbids red-red parent/child pairs and keeps the
/// black-height uniform across all root-to-leaf paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedBlack;

impl Balance for RedBlack {
    type Meta = Color;

    const NAME: &'static str = "RedBlackTreeMap";

    fn rebalance<K, V>(
        arena: &mut [TreeNode<K, V, Color>],
        root: Option<u32>,
        change: Change<Color>,
    ) -> Option<u32> {
        match change {
            Change::Inserted(node) => util::insert_fixup(arena, root, node),
            Change::Removed {
                parent,
                left,
                child,
                meta,
            } => util::remove_fixup(arena, root, parent, left, child, meta),
            Change::Accessed(_) => root,
        }
    }

    fn annotate(meta: &Color) -> Option<String> {
        Some(meta.to_string())
    }

    fn assert_balanced<K, V>(
        arena: &[TreeNode<K, V, Color>],
        root: Option<u32>,
    ) -> Result<(), String> {
        util::assert_red_black_tree(arena, root)
    }
}
