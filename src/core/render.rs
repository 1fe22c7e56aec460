use std::cmp::Ordering;

use crate::models::TreeNode;

/// Directories first, then case-sensitive lexical order within each group.
pub fn listing_order(children: &[TreeNode]) -> Vec<&TreeNode> {
    let mut sorted: Vec<&TreeNode> = children.iter().collect();
    sorted.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });
    sorted
}

/// ASCII tree of `children`, one line per node.
pub fn render_lines(children: &[TreeNode]) -> Vec<String> {
    let mut lines = Vec::new();
    render_inner(&mut lines, children, &[]);
    lines
}

fn render_inner(lines: &mut Vec<String>, children: &[TreeNode], ancestor_has_more: &[bool]) {
    let ordered = listing_order(children);

    for (index, node) in ordered.iter().enumerate() {
        let is_last = index + 1 == ordered.len();
        let mut line = String::new();

        for &has_more in ancestor_has_more {
            line.push_str(if has_more { "|   " } else { "    " });
        }
        line.push_str(if is_last { "`-- " } else { "|-- " });
        line.push_str(&node.name);
        if node.is_dir() {
            line.push('/');
        }
        lines.push(line);

        if let Some(grandchildren) = node.children()
            && !grandchildren.is_empty()
        {
            let mut next_ancestor_has_more = ancestor_has_more.to_vec();
            next_ancestor_has_more.push(!is_last);
            render_inner(lines, grandchildren, &next_ancestor_has_more);
        }
    }
}
