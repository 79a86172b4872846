use crate::entry::Entry;
use crate::types::{KvNode, Node};

/// Arena slot of a [`crate::TreeMap`].
///
/// `entry` is `None` while the slot sits on the free list. `generation` is
/// bumped every time the slot is vacated so that stale positions can be told
/// apart from the node that later reuses the slot.
#[derive(Clone, Debug)]
pub struct TreeNode<K, V, M> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub entry: Option<Entry<K, V>>,
    /// Strategy metadata (height, color, or nothing).
    pub meta: M,
    pub generation: u32,
}

impl<K, V, M> TreeNode<K, V, M> {
    pub fn new(entry: Entry<K, V>, meta: M) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            entry: Some(entry),
            meta,
            generation: 0,
        }
    }

    /// Refills a vacant slot, keeping its generation.
    pub fn occupy(&mut self, entry: Entry<K, V>, meta: M) {
        self.p = None;
        self.l = None;
        self.r = None;
        self.entry = Some(entry);
        self.meta = meta;
    }

    /// Empties the slot and invalidates every position issued for it.
    pub fn vacate(&mut self) -> Option<Entry<K, V>> {
        self.p = None;
        self.l = None;
        self.r = None;
        self.generation = self.generation.wrapping_add(1);
        self.entry.take()
    }

    pub fn is_vacant(&self) -> bool {
        self.entry.is_none()
    }
}

impl<K, V, M> Node for TreeNode<K, V, M> {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl<K, V, M> KvNode<K, V> for TreeNode<K, V, M> {
    fn entry(&self) -> Option<&Entry<K, V>> {
        self.entry.as_ref()
    }

    fn entry_mut(&mut self) -> Option<&mut Entry<K, V>> {
        self.entry.as_mut()
    }
}
