use std::fmt::Debug;

use crate::tree_node::TreeNode;

/// Renders one child subtree given the tab prefix of its line.
pub type PrintChild<'a> = dyn Fn(&str) -> String + 'a;

/// Lays out `children` under the current line as a box-drawing tree.
///
/// Trailing `None` children are dropped; every other child is rendered with
/// the tab its own children should use.
pub fn print_tree(tab: &str, children: &[Option<&PrintChild<'_>>]) -> String {
    let mut out = String::new();
    let Some(last) = children.iter().rposition(Option::is_some) else {
        return out;
    };

    for (i, child) in children.iter().enumerate().take(last + 1) {
        let Some(child) = child else {
            continue;
        };
        let is_last = i == last;
        let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
        let text = child(&child_tab);
        let branch = if text.is_empty() {
            "│"
        } else if is_last {
            "└─"
        } else {
            "├─"
        };

        out.push('\n');
        out.push_str(tab);
        out.push_str(branch);
        if !text.is_empty() {
            out.push(' ');
            out.push_str(&text);
        }
    }

    out
}

enum Piece {
    Text(String),
    Node(u32, String),
}

/// Dumps the subtree at `node`, one entry per line.
///
/// A node with a single child still shows the missing side as `∅` so that
/// left and right can be told apart. Pending subtrees wait on an explicit
/// stack, so a degenerate chain prints without deep recursion.
pub fn print_node<K: Debug, V: Debug, M>(
    arena: &[TreeNode<K, V, M>],
    node: u32,
    tab: &str,
    annotate: &dyn Fn(&M) -> Option<String>,
) -> String {
    let mut out = String::new();
    let mut stack = vec![Piece::Node(node, tab.to_string())];
    while let Some(piece) = stack.pop() {
        let (node, tab) = match piece {
            Piece::Text(text) => {
                out.push_str(&text);
                continue;
            }
            Piece::Node(node, tab) => (node, tab),
        };
        let n = &arena[node as usize];
        match &n.entry {
            Some(entry) => out.push_str(&format!("{:?} = {:?}", entry.key(), entry.value())),
            None => out.push('∅'),
        }
        if let Some(label) = annotate(&n.meta) {
            out.push(' ');
            out.push_str(&label);
        }
        if n.l.is_none() && n.r.is_none() {
            continue;
        }

        // Right goes on first so the left subtree pops first.
        for (branch, arrow, pad, child) in [("└─", "→", " ", n.r), ("├─", "←", "│", n.l)] {
            match child {
                Some(c) => stack.push(Piece::Node(c, format!("{tab}{pad}  "))),
                None => stack.push(Piece::Text("∅".to_string())),
            }
            stack.push(Piece::Text(format!("\n{tab}{branch} {arrow} ")));
        }
    }
    out
}

/// Dumps a whole tree under a `name` heading.
pub fn print<K: Debug, V: Debug, M>(
    arena: &[TreeNode<K, V, M>],
    root: Option<u32>,
    name: &str,
    annotate: &dyn Fn(&M) -> Option<String>,
) -> String {
    match root {
        None => format!("{name} ∅"),
        Some(root) => {
            let child: &PrintChild<'_> = &|tab: &str| print_node(arena, root, tab, annotate);
            format!("{name}{}", print_tree("", &[Some(child)]))
        }
    }
}
