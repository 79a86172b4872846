use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates an identifier for a new map instance.
pub(crate) fn next_tree_id() -> u64 {
    NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Opaque handle to a node of a specific map.
///
/// A position stays valid until the node it names is removed. Passing it to
/// another map, or using it after removal, yields
/// [`crate::TreeError::InvalidPosition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) tree: u64,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Position {
    /// Arena slot index, for diagnostics only.
    pub fn index(&self) -> u32 {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_ids_are_distinct_and_increasing() {
        let a: u64 = next_tree_id();
        let b = next_tree_id();
        assert!(b > a);
    }
}
