use std::fmt::{self, Debug, Display};
use std::marker::PhantomData;

use tracing::debug;

use crate::avl::Avl;
use crate::balance::{Balance, Change, Unbalanced};
use crate::entry::Entry;
use crate::error::{PositionFault, TreeError};
use crate::iter::{IntoIter, Iter, Keys, Values};
use crate::position::{next_tree_id, Position};
use crate::print::print;
use crate::red_black::RedBlack;
use crate::splay::Splay;
use crate::tree_node::TreeNode;
use crate::types::default_comparator;
use crate::util::{self, Search};

/// Comparator type of maps built with [`TreeMap::new`].
pub type OrdComparator<K> = fn(&K, &K) -> i32;

/// Ordered map on an arena-backed binary search tree.
///
/// `B` picks the balancing strategy at compile time and `C` is the key
/// comparator (negative, zero or positive like [`Ord::cmp`]).
///
/// # Example
///
/// ```
/// use ordered_forest::AvlTreeMap;
///
/// let mut map: AvlTreeMap<i32, &str> = AvlTreeMap::new();
/// map.put(2, "two");
/// map.put(1, "one");
/// assert_eq!(map.get(&1), Some(&"one"));
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
/// ```
pub struct TreeMap<K, V, B: Balance = Unbalanced, C = OrdComparator<K>> {
    arena: Vec<TreeNode<K, V, B::Meta>>,
    root: Option<u32>,
    free: Vec<u32>,
    len: usize,
    comparator: C,
    id: u64,
    _balance: PhantomData<B>,
}

// Links are `u32`, so the arena never grows past `u32::MAX` slots.
fn slot_index(len: usize) -> u32 {
    match u32::try_from(len) {
        Ok(slot) => slot,
        Err(_) => panic!("tree map exceeds {} node slots", u32::MAX),
    }
}

/// Unbalanced binary search tree map.
pub type BinarySearchTreeMap<K, V, C = OrdComparator<K>> = TreeMap<K, V, Unbalanced, C>;
/// Height-balanced map.
pub type AvlTreeMap<K, V, C = OrdComparator<K>> = TreeMap<K, V, Avl, C>;
/// Color-balanced map.
pub type RedBlackTreeMap<K, V, C = OrdComparator<K>> = TreeMap<K, V, RedBlack, C>;
/// Self-adjusting map; recently used keys sit near the root.
pub type SplayTreeMap<K, V, C = OrdComparator<K>> = TreeMap<K, V, Splay, C>;

impl<K: Ord, V, B: Balance> TreeMap<K, V, B> {
    /// Empty map ordered by `K`'s [`Ord`].
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }

    /// Empty map with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = Self::new();
        map.arena.reserve(capacity);
        map
    }
}

impl<K: Ord, V, B: Balance> Default for TreeMap<K, V, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, B, C> TreeMap<K, V, B, C>
where
    B: Balance,
    C: Fn(&K, &K) -> i32,
{
    /// Empty map ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Vec::new(),
            root: None,
            free: Vec::new(),
            len: 0,
            comparator,
            id: next_tree_id(),
            _balance: PhantomData,
        }
    }

    fn find(&self, key: &K) -> Search {
        util::search::<K, V, _, _>(&self.arena, self.root, key, &self.comparator)
    }

    fn touch(&mut self, node: u32) {
        self.root = B::rebalance(&mut self.arena, self.root, Change::Accessed(node));
    }

    fn alloc(&mut self, entry: Entry<K, V>) -> u32 {
        let meta = B::Meta::default();
        match self.free.pop() {
            Some(slot) => {
                debug!(slot, "reusing vacated node slot");
                self.arena[slot as usize].occupy(entry, meta);
                slot
            }
            None => {
                let slot = slot_index(self.arena.len());
                self.arena.push(TreeNode::new(entry, meta));
                slot
            }
        }
    }

    fn release(&mut self, slot: u32) -> Option<Entry<K, V>> {
        let entry = self.arena[slot as usize].vacate();
        self.free.push(slot);
        entry
    }

    fn entry_at(&self, node: u32) -> Option<&Entry<K, V>> {
        self.arena[node as usize].entry.as_ref()
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Looks `key` up, letting the strategy adapt to the access.
    ///
    /// Splay maps move the found node (or the last node visited on a miss)
    /// to the root, hence `&mut self`. Use [`TreeMap::peek`] for a lookup
    /// that never changes shape.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.find(key) {
            Search::Empty => None,
            Search::Missing { parent, .. } => {
                self.touch(parent);
                None
            }
            Search::Found(node) => {
                self.touch(node);
                self.entry_at(node).map(Entry::value)
            }
        }
    }

    /// Mutable access to the value under `key`; adapts like [`TreeMap::get`].
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(key) {
            Search::Empty => None,
            Search::Missing { parent, .. } => {
                self.touch(parent);
                None
            }
            Search::Found(node) => {
                self.touch(node);
                self.arena[node as usize].entry.as_mut().map(Entry::value_mut)
            }
        }
    }

    /// Lookup that never restructures.
    pub fn peek(&self, key: &K) -> Option<&V> {
        match self.find(key) {
            Search::Found(node) => self.entry_at(node).map(Entry::value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.find(key), Search::Found(_))
    }

    /// Inserts `key` or overwrites its value.
    ///
    /// Returns the previous value when the key was present. Overwriting
    /// never changes shape, except that a splay map splays the node.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (parent, left) = match self.find(&key) {
            Search::Found(node) => {
                let old = self.arena[node as usize]
                    .entry
                    .as_mut()
                    .map(|e| e.set_value(value));
                self.touch(node);
                return old;
            }
            Search::Empty => (None, false),
            Search::Missing { parent, left } => (Some(parent), left),
        };

        let node = self.alloc(Entry::new(key, value));
        match parent {
            None => self.root = Some(node),
            Some(p) => {
                if left {
                    util::set_l(&mut self.arena, p, Some(node));
                } else {
                    util::set_r(&mut self.arena, p, Some(node));
                }
                util::set_p(&mut self.arena, node, Some(p));
            }
        }
        self.len += 1;
        self.root = B::rebalance(&mut self.arena, self.root, Change::Inserted(node));
        None
    }

    /// Removes `key`, returning its value.
    ///
    /// Outside splay maps, a node with two children takes over its in-order
    /// successor's entry and the successor's node is unlinked instead, so
    /// positions naming the successor become stale.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self.find(key) {
            Search::Empty => None,
            Search::Missing { parent, .. } => {
                self.touch(parent);
                None
            }
            Search::Found(node) => {
                let (root, slot) = B::detach(&mut self.arena, self.root, node);
                self.root = root;
                self.len -= 1;
                self.release(slot).map(|e| e.into_parts().1)
            }
        }
    }

    /// Drops every entry. Positions issued before the call are rejected
    /// afterwards.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
        self.id = next_tree_id();
    }

    /// Height of the tree; an empty map has height -1, a single entry 0.
    pub fn height(&self) -> i32 {
        util::height(&self.arena, self.root)
    }

    /// Smallest entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        util::first(&self.arena, self.root)
            .and_then(|n| self.entry_at(n))
            .map(|e| (e.key(), e.value()))
    }

    /// Largest entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        util::last(&self.arena, self.root)
            .and_then(|n| self.entry_at(n))
            .map(|e| (e.key(), e.value()))
    }

    /// Fresh in-order iterator over all entries.
    pub fn entries(&self) -> Iter<'_, K, V, B::Meta> {
        Iter::new(
            &self.arena,
            util::first(&self.arena, self.root),
            util::last(&self.arena, self.root),
            self.len,
        )
    }

    pub fn iter(&self) -> Iter<'_, K, V, B::Meta> {
        self.entries()
    }

    pub fn keys(&self) -> Keys<'_, K, V, B::Meta> {
        Keys(self.entries())
    }

    pub fn values(&self) -> Values<'_, K, V, B::Meta> {
        Values(self.entries())
    }

    fn position(&self, node: u32) -> Position {
        Position {
            tree: self.id,
            index: node,
            generation: self.arena[node as usize].generation,
        }
    }

    fn positions(&self, nodes: Vec<u32>) -> Vec<Position> {
        nodes.into_iter().map(|n| self.position(n)).collect()
    }

    /// Checks that `p` names a live node of this map and returns its slot.
    pub fn validate(&self, p: Position) -> Result<u32, TreeError> {
        if p.tree != self.id {
            return Err(TreeError::InvalidPosition(PositionFault::ForeignTree));
        }
        match self.arena.get(p.index as usize) {
            Some(node) if !node.is_vacant() && node.generation == p.generation => Ok(p.index),
            _ => Err(TreeError::InvalidPosition(PositionFault::Removed)),
        }
    }

    pub fn root(&self) -> Option<Position> {
        self.root.map(|r| self.position(r))
    }

    pub fn left(&self, p: Position) -> Result<Option<Position>, TreeError> {
        let node = self.validate(p)?;
        Ok(util::get_l(&self.arena, node).map(|n| self.position(n)))
    }

    pub fn right(&self, p: Position) -> Result<Option<Position>, TreeError> {
        let node = self.validate(p)?;
        Ok(util::get_r(&self.arena, node).map(|n| self.position(n)))
    }

    pub fn parent(&self, p: Position) -> Result<Option<Position>, TreeError> {
        let node = self.validate(p)?;
        Ok(util::get_p(&self.arena, node).map(|n| self.position(n)))
    }

    /// The other child of `p`'s parent; `None` for the root or an only child.
    pub fn sibling(&self, p: Position) -> Result<Option<Position>, TreeError> {
        let node = self.validate(p)?;
        Ok(util::sibling(&self.arena, node).map(|n| self.position(n)))
    }

    pub fn num_children(&self, p: Position) -> Result<usize, TreeError> {
        let node = self.validate(p)?;
        let l = util::get_l(&self.arena, node).is_some();
        let r = util::get_r(&self.arena, node).is_some();
        Ok(usize::from(l) + usize::from(r))
    }

    /// Positions of `p`'s children, left before right.
    pub fn children(&self, p: Position) -> Result<Vec<Position>, TreeError> {
        let node = self.validate(p)?;
        let l = util::get_l(&self.arena, node);
        let r = util::get_r(&self.arena, node);
        Ok(l.into_iter().chain(r).map(|n| self.position(n)).collect())
    }

    pub fn is_root(&self, p: Position) -> Result<bool, TreeError> {
        let node = self.validate(p)?;
        Ok(self.root == Some(node))
    }

    pub fn is_leaf(&self, p: Position) -> Result<bool, TreeError> {
        Ok(self.num_children(p)? == 0)
    }

    pub fn is_internal(&self, p: Position) -> Result<bool, TreeError> {
        Ok(self.num_children(p)? > 0)
    }

    pub fn entry(&self, p: Position) -> Result<&Entry<K, V>, TreeError> {
        let node = self.validate(p)?;
        self.entry_at(node)
            .ok_or(TreeError::InvalidPosition(PositionFault::Removed))
    }

    /// Strategy metadata of the node: AVL height, red-black color, or `()`.
    pub fn meta(&self, p: Position) -> Result<&B::Meta, TreeError> {
        let node = self.validate(p)?;
        Ok(&self.arena[node as usize].meta)
    }

    pub fn key(&self, p: Position) -> Result<&K, TreeError> {
        self.entry(p).map(Entry::key)
    }

    pub fn value(&self, p: Position) -> Result<&V, TreeError> {
        self.entry(p).map(Entry::value)
    }

    /// Positions in ascending key order.
    pub fn in_order(&self) -> Vec<Position> {
        self.positions(util::in_order(&self.arena, self.root))
    }

    pub fn pre_order(&self) -> Vec<Position> {
        self.positions(util::pre_order(&self.arena, self.root))
    }

    pub fn post_order(&self) -> Vec<Position> {
        self.positions(util::post_order(&self.arena, self.root))
    }

    /// Positions level by level from the root.
    pub fn level_order(&self) -> Vec<Position> {
        self.positions(util::level_order(&self.arena, self.root))
    }

    /// Checks key order, parent links, the cached size and the strategy's
    /// balance invariant.
    pub fn assert_valid(&self) -> Result<(), String> {
        let reachable =
            util::assert_search_tree::<K, V, _, _>(&self.arena, self.root, &self.comparator)?;
        if reachable != self.len {
            return Err(format!(
                "Size mismatch: {} reachable, {} recorded",
                reachable, self.len
            ));
        }
        let vacant = self.arena.iter().filter(|n| n.is_vacant()).count();
        if vacant != self.free.len() || self.arena.len() - vacant != self.len {
            return Err("Free list out of sync with arena".to_string());
        }
        B::assert_balanced(&self.arena, self.root)
    }
}

impl<K: Debug, V: Debug, B: Balance, C> TreeMap<K, V, B, C> {
    /// Box-drawing dump of the tree, annotated with strategy metadata.
    pub fn print(&self) -> String {
        print(&self.arena, self.root, B::NAME, &B::annotate)
    }
}

impl<K: Debug, V: Debug, B: Balance, C> Display for TreeMap<K, V, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}

impl<K, V, B, C> Debug for TreeMap<K, V, B, C>
where
    K: Debug,
    V: Debug,
    B: Balance,
    C: Fn(&K, &K) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl<K, V, B, C> Clone for TreeMap<K, V, B, C>
where
    K: Clone,
    V: Clone,
    B: Balance,
    C: Clone,
{
    /// Deep copy with its own identity: positions of the original are
    /// rejected by the clone.
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            root: self.root,
            free: self.free.clone(),
            len: self.len,
            comparator: self.comparator.clone(),
            id: next_tree_id(),
            _balance: PhantomData,
        }
    }
}

impl<K: Ord, V, B: Balance> FromIterator<(K, V)> for TreeMap<K, V, B> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, B, C> Extend<(K, V)> for TreeMap<K, V, B, C>
where
    B: Balance,
    C: Fn(&K, &K) -> i32,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<'a, K, V, B, C> IntoIterator for &'a TreeMap<K, V, B, C>
where
    B: Balance,
    C: Fn(&K, &K) -> i32,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, B::Meta>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl<K, V, B, C> IntoIterator for TreeMap<K, V, B, C>
where
    B: Balance,
    C: Fn(&K, &K) -> i32,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> IntoIter<K, V> {
        let order = util::in_order(&self.arena, self.root);
        let entries = order
            .into_iter()
            .filter_map(|n| self.arena[n as usize].entry.take())
            .collect();
        IntoIter::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_index_accepts_u32_range() {
        assert_eq!(slot_index(0), 0);
        assert_eq!(slot_index(u32::MAX as usize), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    #[should_panic(expected = "node slots")]
    fn slot_index_overflow_panics() {
        slot_index(u32::MAX as usize + 1);
    }

    #[test]
    fn vacated_slots_are_reused() {
        let mut map: BinarySearchTreeMap<i32, i32> = BinarySearchTreeMap::new();
        map.put(1, 10);
        map.put(2, 20);
        assert_eq!(map.remove(&2), Some(20));
        map.put(3, 30);
        assert_eq!(map.arena.len(), 2);
        assert!(map.free.is_empty());
        assert_eq!(map.assert_valid(), Ok(()));
    }

    #[test]
    fn reused_slot_rejects_old_position() {
        let mut map: BinarySearchTreeMap<i32, i32> = BinarySearchTreeMap::new();
        map.put(1, 10);
        map.put(2, 20);
        let stale = map.right(map.root().unwrap()).unwrap().unwrap();
        map.remove(&2);
        map.put(3, 30);
        let fresh = map.right(map.root().unwrap()).unwrap().unwrap();
        assert_eq!(stale.index(), fresh.index());
        assert_eq!(
            map.key(stale),
            Err(TreeError::InvalidPosition(PositionFault::Removed))
        );
        assert_eq!(map.key(fresh), Ok(&3));
    }

    #[test]
    fn clear_and_clone_get_new_identity() {
        let mut map: AvlTreeMap<i32, i32> = (0..4).map(|i| (i, i)).collect();
        let root = map.root().unwrap();
        let copy = map.clone();
        assert_eq!(
            copy.key(root),
            Err(TreeError::InvalidPosition(PositionFault::ForeignTree))
        );
        assert_eq!(copy.assert_valid(), Ok(()));
        map.clear();
        assert!(map.is_empty());
        assert_eq!(
            map.key(root),
            Err(TreeError::InvalidPosition(PositionFault::ForeignTree))
        );
        assert_eq!(map.height(), -1);
    }

    #[test]
    fn owned_iteration_is_ascending() {
        let map: RedBlackTreeMap<i32, String> =
            [3, 1, 2].into_iter().map(|i| (i, i.to_string())).collect();
        let drained: Vec<(i32, String)> = map.into_iter().collect();
        assert_eq!(
            drained,
            vec![(1, "1".to_string()), (2, "2".to_string()), (3, "3".to_string())]
        );
    }
}
