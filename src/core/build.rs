use std::collections::HashSet;

use anyhow::Context;
use regex::RegexSet;
use tracing::debug;

use crate::models::{EntryKind, NodeKind, RepoEntry, Tree, TreeNode};

/// Directory names the repository service never descends into.
pub const IGNORED_DIRECTORIES: &[&str] = &[
    ".git",
    "__pycache__",
    "node_modules",
    "venv",
    "env",
    "dist",
    "build",
    "target",
    "bin",
    "obj",
    "out",
];

/// Filtering applied while turning a listing into a tree.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Pipe-separated names or globs; an entry is dropped if any segment matches.
    pub ignore_pattern: Option<String>,
    /// Whether to keep entries with a segment starting with '.'
    pub show_hidden: bool,
    /// Whether to drop everything under `IGNORED_DIRECTORIES`.
    pub default_ignore: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            ignore_pattern: None,
            show_hidden: true,
            default_ignore: true,
        }
    }
}

/// Decides, segment by segment, whether a listing path belongs in the tree.
///
/// User patterns are split on `|`. Plain names are matched exactly against
/// any segment and wildcard patterns go through a single regex set. The
/// built-in directory names only reject segments that are directories, so a
/// file called `build` survives.
pub struct SegmentFilter {
    ignored_dirs: HashSet<&'static str>,
    names: HashSet<String>,
    globs: Option<RegexSet>,
    show_hidden: bool,
}

impl SegmentFilter {
    pub fn new(options: &BuildOptions) -> anyhow::Result<Self> {
        let ignored_dirs = if options.default_ignore {
            IGNORED_DIRECTORIES.iter().copied().collect()
        } else {
            HashSet::new()
        };

        let mut names = HashSet::new();
        let mut globs = Vec::new();
        let pattern = options.ignore_pattern.as_deref().unwrap_or_default();
        for name in pattern.split('|').map(str::trim).filter(|p| !p.is_empty()) {
            if name.contains(['*', '?']) {
                globs.push(glob_to_regex(name));
            } else {
                names.insert(name.to_owned());
            }
        }

        let globs = if globs.is_empty() {
            None
        } else {
            Some(
                RegexSet::new(&globs)
                    .with_context(|| format!("Invalid ignore pattern: {pattern}"))?,
            )
        };

        Ok(Self {
            ignored_dirs,
            names,
            globs,
            show_hidden: options.show_hidden,
        })
    }

    /// True when no segment of the path is filtered out. Every segment but
    /// the last is a directory; the last one is whatever `kind` says.
    pub fn admits(&self, segments: &[&str], kind: EntryKind) -> bool {
        let dirs = match kind {
            EntryKind::Directory => segments.len(),
            EntryKind::File => segments.len().saturating_sub(1),
        };
        !segments
            .iter()
            .enumerate()
            .any(|(depth, segment)| self.rejects(segment, depth < dirs))
    }

    fn rejects(&self, segment: &str, is_dir: bool) -> bool {
        (!self.show_hidden && segment.starts_with('.'))
            || (is_dir && self.ignored_dirs.contains(segment))
            || self.names.contains(segment)
            || self
                .globs
                .as_ref()
                .is_some_and(|globs| globs.is_match(segment))
    }
}

/// `*` matches any run of characters, `?` exactly one; everything else is literal.
fn glob_to_regex(glob: &str) -> String {
    let mut anchored = String::from("^");
    let mut literal = String::new();

    for c in glob.chars() {
        let wildcard = match c {
            '*' => ".*",
            '?' => ".",
            _ => {
                literal.push(c);
                continue;
            }
        };
        anchored.push_str(&regex::escape(&literal));
        literal.clear();
        anchored.push_str(wildcard);
    }

    anchored.push_str(&regex::escape(&literal));
    anchored.push('$');
    anchored
}

/// Build a tree from a flat repository listing.
///
/// Missing ancestors are synthesized as directories. The first entry to
/// claim a path decides its kind; later conflicting entries are ignored.
/// Returns an error only if the ignore pattern is invalid.
pub fn build_tree<I>(entries: I, options: &BuildOptions) -> anyhow::Result<Tree>
where
    I: IntoIterator<Item = RepoEntry>,
{
    let filter = SegmentFilter::new(options)?;

    let mut tree = Tree::new();
    for entry in entries {
        let segments = split_segments(&entry.path);
        if segments.is_empty() || segments.iter().any(|s| *s == "." || *s == "..") {
            debug!(path = %entry.path, "skipping listing entry with unusable path");
            continue;
        }

        if !filter.admits(&segments, entry.kind) {
            continue;
        }

        if !insert_entry(&mut tree.children, &segments, entry.kind) {
            debug!(path = %entry.path, "listing entry not inserted");
        }
    }

    Ok(tree)
}

pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Position of `name` among sorted siblings, or where it would be inserted.
pub(crate) fn find_child(children: &[TreeNode], name: &str) -> Result<usize, usize> {
    children.binary_search_by(|child| child.name.as_str().cmp(name))
}

/// Walk `segments` from `children`, creating missing directories.
/// Returns `None` when a segment names an existing file.
pub(crate) fn descend_creating<'a>(
    mut children: &'a mut Vec<TreeNode>,
    segments: &[&str],
) -> Option<&'a mut Vec<TreeNode>> {
    for (depth, segment) in segments.iter().enumerate() {
        let index = match find_child(children, segment) {
            Ok(index) => index,
            Err(index) => {
                let path = segments[..=depth].join("/");
                children.insert(index, TreeNode::directory(*segment, path));
                index
            }
        };

        match &mut children[index].kind {
            NodeKind::Directory { children: next } => children = next,
            NodeKind::File { .. } => return None,
        }
    }
    Some(children)
}

/// Insert the final segment with `kind`. Returns false if the path already
/// existed or an ancestor is a file.
pub(crate) fn insert_entry(root: &mut Vec<TreeNode>, segments: &[&str], kind: EntryKind) -> bool {
    let Some((name, ancestors)) = segments.split_last() else {
        return false;
    };
    let Some(parent) = descend_creating(root, ancestors) else {
        return false;
    };

    match find_child(parent, name) {
        Ok(_) => false,
        Err(index) => {
            let path = segments.join("/");
            let node = match kind {
                EntryKind::Directory => TreeNode::directory(*name, path),
                EntryKind::File => TreeNode::file(*name, path),
            };
            parent.insert(index, node);
            true
        }
    }
}
