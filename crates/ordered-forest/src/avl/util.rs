use tracing::trace;

use crate::tree_node::TreeNode;
use crate::util::{get_l, get_p, get_r, restructure};

#[inline]
fn height<K, V>(arena: &[TreeNode<K, V, i32>], node: Option<u32>) -> i32 {
    node.map_or(-1, |i| arena[i as usize].meta)
}

#[inline]
fn refresh<K, V>(arena: &mut [TreeNode<K, V, i32>], i: u32) {
    let h = 1 + height(arena, get_l(arena, i)).max(height(arena, get_r(arena, i)));
    arena[i as usize].meta = h;
}

/// `height(left) - height(right)`.
#[inline]
pub fn balance_factor<K, V>(arena: &[TreeNode<K, V, i32>], i: u32) -> i32 {
    height(arena, get_l(arena, i)) - height(arena, get_r(arena, i))
}

/// Taller child of `i`; ties go left when `prefer_left` is set.
fn taller_child<K, V>(
    arena: &[TreeNode<K, V, i32>],
    i: u32,
    prefer_left: bool,
) -> Option<u32> {
    let l = get_l(arena, i);
    let r = get_r(arena, i);
    let (hl, hr) = (height(arena, l), height(arena, r));
    if hl > hr || (hl == hr && prefer_left) {
        l
    } else {
        r
    }
}

/// Walks from `start` to the root refreshing heights and restructuring every
/// node whose balance factor left `[-1, 1]`. Returns the new root.
pub fn rebalance<K, V>(
    arena: &mut [TreeNode<K, V, i32>],
    mut root: Option<u32>,
    start: Option<u32>,
) -> Option<u32> {
    let mut curr = start;
    while let Some(v) = curr {
        refresh(arena, v);
        let mut top = v;
        let bf = balance_factor(arena, v);
        if bf.abs() > 1 {
            let c_left = bf > 0;
            let c = if c_left {
                get_l(arena, v)
            } else {
                get_r(arena, v)
            };
            let Some(g) = c.and_then(|c| taller_child(arena, c, c_left)) else {
                return root;
            };
            trace!(node = v, grandchild = g, bf, "avl restructure");
            let (new_root, t) = restructure(arena, root, g);
            root = new_root;
            top = t;
            if let Some(l) = get_l(arena, top) {
                refresh(arena, l);
            }
            if let Some(r) = get_r(arena, top) {
                refresh(arena, r);
            }
            refresh(arena, top);
        }
        curr = get_p(arena, top);
    }
    root
}

/// Verifies cached heights and the AVL balance condition. Returns the height
/// of the tree.
pub fn assert_avl_tree<K, V>(
    arena: &[TreeNode<K, V, i32>],
    root: Option<u32>,
) -> Result<i32, String> {
    let Some(node) = root else {
        return Ok(-1);
    };
    let lh = assert_avl_tree(arena, get_l(arena, node))?;
    let rh = assert_avl_tree(arena, get_r(arena, node))?;
    if (lh - rh).abs() > 1 {
        return Err(format!("Node {node} is unbalanced: {lh} vs {rh}"));
    }
    let h = 1 + lh.max(rh);
    if arena[node as usize].meta != h {
        return Err(format!(
            "Node {node} caches height {} but has height {h}",
            arena[node as usize].meta
        ));
    }
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::util::{set_l, set_p};

    fn leaf(k: i32) -> TreeNode<i32, (), i32> {
        TreeNode::new(Entry::new(k, ()), 0)
    }

    #[test]
    fn left_left_chain_is_rotated_once() {
        // 30 <- 20 <- 10, heights stale as right after attaching 10.
        let mut arena = vec![leaf(30), leaf(20), leaf(10)];
        set_l(&mut arena, 0, Some(1));
        set_p(&mut arena, 1, Some(0));
        set_l(&mut arena, 1, Some(2));
        set_p(&mut arena, 2, Some(1));
        arena[0].meta = 1;

        let root = rebalance(&mut arena, Some(0), Some(2));
        assert_eq!(root, Some(1));
        assert_eq!(get_l(&arena, 1), Some(2));
        assert_eq!(get_r(&arena, 1), Some(0));
        assert_eq!(assert_avl_tree(&arena, root), Ok(1));
    }

    #[test]
    fn stale_height_is_reported() {
        let mut arena = vec![leaf(2), leaf(1)];
        set_l(&mut arena, 0, Some(1));
        set_p(&mut arena, 1, Some(0));
        assert!(assert_avl_tree(&arena, Some(0)).is_err());
        arena[0].meta = 1;
        assert_eq!(assert_avl_tree(&arena, Some(0)), Ok(1));
        assert_eq!(balance_factor(&arena, 0), 1);
    }
}
