//! Node trait definitions.
//!
//! Nodes live in a `Vec`-backed arena owned by the map. Every "pointer" is an
//! `Option<u32>` index into that arena: children are owned downward, the
//! parent index is a plain back-reference used only for upward walks.

use crate::entry::Entry;

/// Tree links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Key/value node interface used by the map core.
///
/// Vacant arena slots have no entry, so the accessors return `Option`.
pub trait KvNode<K, V>: Node {
    fn entry(&self) -> Option<&Entry<K, V>>;
    fn entry_mut(&mut self) -> Option<&mut Entry<K, V>>;

    fn key<'a>(&'a self) -> Option<&'a K>
    where
        K: 'a,
        V: 'a,
    {
        self.entry().map(Entry::key)
    }

    fn value<'a>(&'a self) -> Option<&'a V>
    where
        V: 'a,
        K: 'a,
    {
        self.entry().map(Entry::value)
    }
}

/// Comparator used by [`crate::TreeMap::new`].
pub fn default_comparator<K: Ord>(a: &K, b: &K) -> i32 {
    a.cmp(b) as i32
}
