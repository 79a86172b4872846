//! Link-level tree utilities shared by every balancing strategy.
//!
//! Everything here works on an arena slice and `u32` node indices through the
//! [`Node`] trait. [`rotate`] is the only function that changes tree shape;
//! [`restructure`] and every strategy are built from it.

use std::collections::VecDeque;

use crate::types::{KvNode, Node};

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

/// `true` if `idx` is the left child of its parent.
#[inline]
pub fn is_left_child<N: Node>(arena: &[N], idx: u32) -> bool {
    get_p(arena, idx).is_some_and(|p| get_l(arena, p) == Some(idx))
}

/// The other child of `idx`'s parent.
pub fn sibling<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    let p = get_p(arena, idx)?;
    if get_l(arena, p) == Some(idx) {
        get_r(arena, p)
    } else {
        get_l(arena, p)
    }
}

/// Points `parent`'s link that used to hold `old` at `new` and sets `new`'s
/// parent. With no parent, `new` becomes the root.
pub(crate) fn replace_child<N: Node>(
    arena: &mut [N],
    parent: Option<u32>,
    old: u32,
    new: Option<u32>,
) {
    if let Some(p) = parent {
        if get_l(arena, p) == Some(old) {
            set_l(arena, p, new);
        } else {
            set_r(arena, p, new);
        }
    }
    if let Some(n) = new {
        set_p(arena, n, parent);
    }
}

/// Leftmost node under `root`.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}

/// Rightmost node under `root`.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_r(arena, idx) {
            Some(r) => curr = Some(r),
            None => return Some(idx),
        }
    }
    curr
}

/// In-order successor.
pub fn next<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, node) {
        return first(arena, Some(r));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &[N], node: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, node) {
        return last(arena, Some(l));
    }
    let mut curr = node;
    let mut p = get_p(arena, node);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// Number of nodes under `root`.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    let mut stack: Vec<u32> = root.into_iter().collect();
    let mut count = 0;
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(get_l(arena, node));
        stack.extend(get_r(arena, node));
    }
    count
}

/// Height of the subtree at `root`; an empty subtree has height -1.
///
/// Counts levels breadth-first, so degenerate chains cost no stack depth.
pub fn height<N: Node>(arena: &[N], root: Option<u32>) -> i32 {
    let mut queue: VecDeque<(u32, i32)> = root.map(|r| (r, 0)).into_iter().collect();
    let mut deepest = -1;
    while let Some((node, depth)) = queue.pop_front() {
        deepest = deepest.max(depth);
        for child in [get_l(arena, node), get_r(arena, node)].into_iter().flatten() {
            queue.push_back((child, depth + 1));
        }
    }
    deepest
}

/// Outcome of a key descent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Search {
    /// The tree is empty.
    Empty,
    /// The key lives at this node.
    Found(u32),
    /// The key is absent; it would hang off `parent` on the given side.
    Missing { parent: u32, left: bool },
}

/// Descends from `root` comparing `key` with each node's key.
///
/// Comparisons happen before any link is touched, so a panicking comparator
/// leaves the tree intact.
pub fn search<K, V, N, C>(arena: &[N], root: Option<u32>, key: &K, comparator: &C) -> Search
where
    N: KvNode<K, V>,
    C: Fn(&K, &K) -> i32,
{
    let Some(mut curr) = root else {
        return Search::Empty;
    };
    loop {
        let Some(curr_key) = arena[curr as usize].key() else {
            return Search::Empty;
        };
        let cmp = comparator(key, curr_key);
        if cmp == 0 {
            return Search::Found(curr);
        }
        let left = cmp < 0;
        let next = if left {
            get_l(arena, curr)
        } else {
            get_r(arena, curr)
        };
        match next {
            Some(n) => curr = n,
            None => return Search::Missing { parent: curr, left },
        }
    }
}

/// Promotes `x` above its parent `y`.
///
/// ```text
///       y            x
///      / \          / \
///     x   c   →    a   y
///    / \              / \
///   a   b            b   c
/// ```
///
/// The mirrored case is handled symmetrically. The subtree `b` between `x`
/// and `y` changes sides; the parent links of `x`, `y`, `b` and the former
/// grandparent are all rewritten. Returns the (possibly new) root.
pub fn rotate<N: Node>(arena: &mut [N], root: Option<u32>, x: u32) -> Option<u32> {
    let Some(y) = get_p(arena, x) else {
        return root;
    };
    let z = get_p(arena, y);
    let x_is_left = get_l(arena, y) == Some(x);

    replace_child(arena, z, y, Some(x));

    if x_is_left {
        let b = get_r(arena, x);
        set_l(arena, y, b);
        if let Some(b) = b {
            set_p(arena, b, Some(y));
        }
        set_r(arena, x, Some(y));
    } else {
        let b = get_l(arena, x);
        set_r(arena, y, b);
        if let Some(b) = b {
            set_p(arena, b, Some(y));
        }
        set_l(arena, x, Some(y));
    }
    set_p(arena, y, Some(x));

    if z.is_none() {
        Some(x)
    } else {
        root
    }
}

/// Trinode restructuring of `x`, its parent and its grandparent.
///
/// Zig-zig (same side) is one rotation of the parent; zig-zag is two
/// rotations of `x`. Returns the new root and the node now at the top of the
/// three. Without a grandparent nothing changes and `x` is returned.
pub fn restructure<N: Node>(arena: &mut [N], root: Option<u32>, x: u32) -> (Option<u32>, u32) {
    let Some(y) = get_p(arena, x) else {
        return (root, x);
    };
    let Some(z) = get_p(arena, y) else {
        return (root, x);
    };
    let zig_zig = (get_l(arena, y) == Some(x)) == (get_l(arena, z) == Some(y));
    if zig_zig {
        (rotate(arena, root, y), y)
    } else {
        let root = rotate(arena, root, x);
        (rotate(arena, root, x), x)
    }
}

/// Nodes in pre-order (node, left, right).
pub fn pre_order<N: Node>(arena: &[N], root: Option<u32>) -> Vec<u32> {
    let mut out = Vec::new();
    let mut stack: Vec<u32> = root.into_iter().collect();
    while let Some(i) = stack.pop() {
        out.push(i);
        if let Some(r) = get_r(arena, i) {
            stack.push(r);
        }
        if let Some(l) = get_l(arena, i) {
            stack.push(l);
        }
    }
    out
}

/// Nodes in in-order (left, node, right), i.e. ascending key order.
pub fn in_order<N: Node>(arena: &[N], root: Option<u32>) -> Vec<u32> {
    let mut out = Vec::new();
    let mut curr = first(arena, root);
    while let Some(i) = curr {
        out.push(i);
        curr = next(arena, i);
    }
    out
}

/// Nodes in post-order (left, right, node).
pub fn post_order<N: Node>(arena: &[N], root: Option<u32>) -> Vec<u32> {
    // Reverse of a (node, right, left) pre-order walk.
    let mut out = Vec::new();
    let mut stack: Vec<u32> = root.into_iter().collect();
    while let Some(i) = stack.pop() {
        out.push(i);
        if let Some(l) = get_l(arena, i) {
            stack.push(l);
        }
        if let Some(r) = get_r(arena, i) {
            stack.push(r);
        }
    }
    out.reverse();
    out
}

/// Nodes level by level, left to right.
pub fn level_order<N: Node>(arena: &[N], root: Option<u32>) -> Vec<u32> {
    let mut out = Vec::new();
    let mut queue: VecDeque<u32> = root.into_iter().collect();
    while let Some(i) = queue.pop_front() {
        out.push(i);
        if let Some(l) = get_l(arena, i) {
            queue.push_back(l);
        }
        if let Some(r) = get_r(arena, i) {
            queue.push_back(r);
        }
    }
    out
}

/// Checks parent back-links and in-order key ordering under `root`.
pub fn assert_search_tree<K, V, N, C>(
    arena: &[N],
    root: Option<u32>,
    comparator: &C,
) -> Result<usize, String>
where
    N: KvNode<K, V>,
    C: Fn(&K, &K) -> i32,
{
    let Some(root) = root else {
        return Ok(0);
    };
    if get_p(arena, root).is_some() {
        return Err("Root has parent".to_string());
    }

    let nodes = pre_order(arena, Some(root));
    for &i in &nodes {
        if arena[i as usize].entry().is_none() {
            return Err(format!("Vacant slot {i} is linked into the tree"));
        }
        if let Some(l) = get_l(arena, i) {
            if get_p(arena, l) != Some(i) {
                return Err("Broken parent link on left child".to_string());
            }
        }
        if let Some(r) = get_r(arena, i) {
            if get_p(arena, r) != Some(i) {
                return Err("Broken parent link on right child".to_string());
            }
        }
    }

    let ordered = in_order(arena, Some(root));
    for pair in ordered.windows(2) {
        let (Some(a), Some(b)) = (arena[pair[0] as usize].key(), arena[pair[1] as usize].key())
        else {
            return Err("Vacant slot in traversal".to_string());
        };
        if comparator(a, b) >= 0 {
            return Err("Node order violated".to_string());
        }
    }

    Ok(nodes.len())
}
