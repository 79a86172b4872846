use tracing::trace;

use crate::tree_node::TreeNode;
use crate::util::{get_l, get_p, get_r, is_left_child, restructure, rotate, sibling};

use super::Color;

#[inline]
fn is_black<K, V>(arena: &[TreeNode<K, V, Color>], i: Option<u32>) -> bool {
    i.map_or(true, |i| arena[i as usize].meta == Color::Black)
}

#[inline]
fn is_red<K, V>(arena: &[TreeNode<K, V, Color>], i: Option<u32>) -> bool {
    !is_black(arena, i)
}

#[inline]
fn color<K, V>(arena: &[TreeNode<K, V, Color>], i: u32) -> Color {
    arena[i as usize].meta
}

#[inline]
fn set_color<K, V>(arena: &mut [TreeNode<K, V, Color>], i: u32, c: Color) {
    arena[i as usize].meta = c;
}

fn paint_children<K, V>(arena: &mut [TreeNode<K, V, Color>], i: u32, c: Color) {
    if let Some(l) = get_l(arena, i) {
        set_color(arena, l, c);
    }
    if let Some(r) = get_r(arena, i) {
        set_color(arena, r, c);
    }
}

fn blacken_root<K, V>(arena: &mut [TreeNode<K, V, Color>], root: Option<u32>) -> Option<u32> {
    if let Some(r) = root {
        set_color(arena, r, Color::Black);
    }
    root
}

/// Repairs a red-red violation introduced by attaching the red leaf `n`.
pub fn insert_fixup<K, V>(
    arena: &mut [TreeNode<K, V, Color>],
    mut root: Option<u32>,
    mut n: u32,
) -> Option<u32> {
    set_color(arena, n, Color::Red);
    loop {
        let Some(p) = get_p(arena, n) else {
            break;
        };
        if is_black(arena, Some(p)) {
            break;
        }
        let Some(g) = get_p(arena, p) else {
            break;
        };
        let u = sibling(arena, p);
        if is_red(arena, u) {
            trace!(node = n, grandparent = g, "red-black recolor");
            set_color(arena, p, Color::Black);
            if let Some(u) = u {
                set_color(arena, u, Color::Black);
            }
            set_color(arena, g, Color::Red);
            n = g;
            continue;
        }
        trace!(node = n, grandparent = g, "red-black restructure");
        let (new_root, top) = restructure(arena, root, n);
        root = new_root;
        set_color(arena, top, Color::Black);
        paint_children(arena, top, Color::Red);
        break;
    }
    blacken_root(arena, root)
}

/// Repairs black-height after a splice.
///
/// `child` took the place of a removed node colored `removed` under `parent`
/// on the `left` (or right) side.
pub fn remove_fixup<K, V>(
    arena: &mut [TreeNode<K, V, Color>],
    mut root: Option<u32>,
    parent: Option<u32>,
    left: bool,
    child: Option<u32>,
    removed: Color,
) -> Option<u32> {
    if removed == Color::Red {
        return root;
    }
    if let Some(c) = child {
        if color(arena, c) == Color::Red {
            set_color(arena, c, Color::Black);
            return root;
        }
    }

    // Double black sits on the `x_left` side of `z`.
    let mut z_opt = parent;
    let mut x_left = left;
    while let Some(z) = z_opt {
        let y = if x_left {
            get_r(arena, z)
        } else {
            get_l(arena, z)
        };
        let Some(y) = y else {
            break;
        };

        if is_red(arena, Some(y)) {
            trace!(parent = z, sibling = y, "red-black double black: red sibling");
            root = rotate(arena, root, y);
            set_color(arena, y, Color::Black);
            set_color(arena, z, Color::Red);
            continue;
        }

        let yl = get_l(arena, y);
        let yr = get_r(arena, y);
        if is_red(arena, yl) || is_red(arena, yr) {
            let Some(x) = (if is_red(arena, yl) { yl } else { yr }) else {
                break;
            };
            trace!(parent = z, sibling = y, "red-black double black: restructure");
            let z_color = color(arena, z);
            let (new_root, middle) = restructure(arena, root, x);
            root = new_root;
            set_color(arena, middle, z_color);
            paint_children(arena, middle, Color::Black);
            break;
        }

        trace!(parent = z, sibling = y, "red-black double black: recolor");
        set_color(arena, y, Color::Red);
        if color(arena, z) == Color::Red {
            set_color(arena, z, Color::Black);
            break;
        }
        x_left = is_left_child(arena, z);
        z_opt = get_p(arena, z);
    }

    blacken_root(arena, root)
}

/// Verifies root color, red-red freedom and uniform black-height.
pub fn assert_red_black_tree<K, V>(
    arena: &[TreeNode<K, V, Color>],
    root: Option<u32>,
) -> Result<(), String> {
    let Some(root) = root else {
        return Ok(());
    };
    if color(arena, root) != Color::Black {
        return Err("Root is not black".to_string());
    }

    fn black_height<K, V>(
        arena: &[TreeNode<K, V, Color>],
        node: Option<u32>,
    ) -> Result<usize, String> {
        let Some(node) = node else {
            return Ok(1);
        };

        let l = get_l(arena, node);
        let r = get_r(arena, node);
        if is_red(arena, Some(node)) {
            if is_red(arena, l) {
                return Err("Red node has red left child".to_string());
            }
            if is_red(arena, r) {
                return Err("Red node has red right child".to_string());
            }
        }

        let lh = black_height(arena, l)?;
        let rh = black_height(arena, r)?;
        if lh != rh {
            return Err("Black height mismatch".to_string());
        }

        Ok(lh + usize::from(is_black(arena, Some(node))))
    }

    black_height(arena, Some(root)).map(|_| ())
}
