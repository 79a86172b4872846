//! The balancing extension point of the search-tree core.
//!
//! [`crate::TreeMap`] performs the search and the structural edit itself and
//! then reports what happened to its [`Balance`] strategy as a [`Change`].
//! Strategies repair their invariant using only [`crate::util::rotate`] /
//! [`crate::util::restructure`] and updates to their per-node metadata.

use std::fmt::Debug;

use crate::tree_node::TreeNode;
use crate::util::{first, get_l, get_p, get_r, is_left_child, replace_child};

/// A structural event reported to [`Balance::rebalance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change<M> {
    /// A new leaf was attached at this node.
    Inserted(u32),
    /// A lookup ended at this node without changing shape (hit, miss, or
    /// value overwrite).
    Accessed(u32),
    /// A node with at most one child was spliced out. `child` now occupies
    /// the slot under `parent` on the `left`/right side; `meta` is the
    /// metadata the removed node carried.
    Removed {
        parent: Option<u32>,
        left: bool,
        child: Option<u32>,
        meta: M,
    },
}

/// Balancing strategy of a [`crate::TreeMap`], chosen at compile time.
pub trait Balance {
    /// Per-node metadata. `Default` is the value given to fresh leaves.
    type Meta: Clone + Debug + Default;

    /// Map name used by [`crate::TreeMap::print`].
    const NAME: &'static str;

    /// Restores the strategy invariant after `change`; returns the new root.
    fn rebalance<K, V>(
        arena: &mut [TreeNode<K, V, Self::Meta>],
        root: Option<u32>,
        change: Change<Self::Meta>,
    ) -> Option<u32>;

    /// Unlinks `node` from the tree and rebalances.
    ///
    /// Returns the new root and the arena slot that was emptied of the
    /// removed entry. The default is plain search-tree deletion (see
    /// [`unlink`]) followed by [`Balance::rebalance`].
    fn detach<K, V>(
        arena: &mut [TreeNode<K, V, Self::Meta>],
        root: Option<u32>,
        node: u32,
    ) -> (Option<u32>, u32) {
        let (root, slot, change) = unlink(arena, root, node);
        (Self::rebalance(arena, root, change), slot)
    }

    /// Short metadata label for tree dumps.
    fn annotate(_meta: &Self::Meta) -> Option<String> {
        None
    }

    /// Checks the strategy's shape invariant.
    fn assert_balanced<K, V>(
        _arena: &[TreeNode<K, V, Self::Meta>],
        _root: Option<u32>,
    ) -> Result<(), String> {
        Ok(())
    }
}

/// Search-tree deletion of `node` without any rebalancing.
///
/// A node with two children trades entries with its in-order successor (the
/// leftmost node of its right subtree) and the successor is spliced out
/// instead, so the node that leaves the tree always has at most one child.
/// Returns the new root, the slot now holding the removed entry, and the
/// [`Change::Removed`] describing the splice.
pub fn unlink<K, V, M: Clone>(
    arena: &mut [TreeNode<K, V, M>],
    root: Option<u32>,
    node: u32,
) -> (Option<u32>, u32, Change<M>) {
    let mut target = node;
    if let (Some(_), Some(r)) = (get_l(arena, node), get_r(arena, node)) {
        let successor = first(arena, Some(r)).unwrap_or(r);
        let moved = arena[successor as usize].entry.take();
        let kept = std::mem::replace(&mut arena[node as usize].entry, moved);
        arena[successor as usize].entry = kept;
        target = successor;
    }

    let parent = get_p(arena, target);
    let left = is_left_child(arena, target);
    let child = get_l(arena, target).or(get_r(arena, target));
    replace_child(arena, parent, target, child);
    let root = if parent.is_none() { child } else { root };
    let meta = arena[target as usize].meta.clone();

    (
        root,
        target,
        Change::Removed {
            parent,
            left,
            child,
            meta,
        },
    )
}

/// Plain binary search tree: no metadata, no rebalancing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbalanced;

impl Balance for Unbalanced {
    type Meta = ();

    const NAME: &'static str = "BinarySearchTreeMap";

    fn rebalance<K, V>(
        _arena: &mut [TreeNode<K, V, ()>],
        root: Option<u32>,
        _change: Change<()>,
    ) -> Option<u32> {
        root
    }
}

