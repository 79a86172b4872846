//! Ordered maps on an arena-backed binary search tree with pluggable
//! balancing.
//!
//! One search-tree core ([`TreeMap`]) does the searching, the insertion and
//! the physical deletion, then reports every structural edit to a
//! [`Balance`] strategy chosen as a type parameter:
//!
//! - [`Unbalanced`] keeps whatever shape the insertion order produces.
//! - [`Avl`] caches subtree heights and keeps sibling heights within one.
//! - [`RedBlack`] colors nodes and keeps black-height uniform.
//! - [`Splay`] moves every accessed node to the root.
//!
//! All strategies change shape only through [`util::rotate`].
//!
//! Nodes live in a `Vec` arena owned by the map; links are `Option<u32>`
//! indices. Callers see nodes only as [`Position`] handles, which are
//! checked against the owning map and the slot generation on every use.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] / [`KvNode`] traits, comparator helpers |
//! [`tree_node`] | arena slot [`TreeNode`] |
//! [`util`] | search, `rotate`, `restructure`, walks and checks |
//! [`balance`] | [`Balance`] trait, [`Change`], [`Unbalanced`] |
//! [`avl`] | height-balanced strategy |
//! [`red_black`] | color-balanced strategy |
//! [`splay`] | move-to-root strategy |
//! [`print`] | box-drawing tree dumps |
//! [`iter`] | in-order iterators |

pub mod avl;
pub mod balance;
pub mod entry;
pub mod error;
pub mod iter;
pub mod map;
pub mod position;
pub mod print;
pub mod red_black;
pub mod splay;
pub mod tree_node;
pub mod types;
pub mod util;

pub use avl::Avl;
pub use balance::{Balance, Change, Unbalanced};
pub use entry::Entry;
pub use error::{PositionFault, TreeError};
pub use map::{
    AvlTreeMap, BinarySearchTreeMap, OrdComparator, RedBlackTreeMap, SplayTreeMap, TreeMap,
};
pub use position::Position;
pub use red_black::{Color, RedBlack};
pub use splay::Splay;
pub use tree_node::TreeNode;
pub use types::{default_comparator, KvNode, Node};
