use crate::error::FsError;
use crate::models::{EntryKind, NodeKind, Tree, TreeNode};

use super::build::{find_child, insert_entry, split_segments};

/// Create an empty file at the root-relative `path`, adding any missing
/// parent directories.
///
/// The tree is validated before anything is inserted, so a failure never
/// leaves behind partially created ancestors.
pub fn create_file(tree: &mut Tree, path: &str) -> Result<(), FsError> {
    let segments = split_segments(path);
    if segments.is_empty() || segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(FsError::InvalidPath(path.to_owned()));
    }

    check_creatable(&tree.children, &segments)?;

    if insert_entry(&mut tree.children, &segments, EntryKind::File) {
        Ok(())
    } else {
        Err(FsError::DuplicateEntry(segments.join("/")))
    }
}

fn check_creatable(mut children: &[TreeNode], segments: &[&str]) -> Result<(), FsError> {
    for (depth, segment) in segments.iter().enumerate() {
        let Ok(index) = find_child(children, segment) else {
            return Ok(());
        };
        let node = &children[index];
        if depth + 1 == segments.len() {
            return Err(FsError::DuplicateEntry(node.path.clone()));
        }
        match &node.kind {
            NodeKind::Directory { children: next } => children = next,
            NodeKind::File { .. } => return Err(FsError::NotADirectory(node.path.clone())),
        }
    }
    Ok(())
}

/// Cache `content` on the file at `path`.
pub fn set_content(tree: &mut Tree, path: &str, content: String) -> Result<(), FsError> {
    let segments = split_segments(path);
    let Some((name, ancestors)) = segments.split_last() else {
        return Err(FsError::NotAFile(path.to_owned()));
    };

    let mut children = &mut tree.children;
    for segment in ancestors {
        let index =
            find_child(children, segment).map_err(|_| FsError::NotFound(path.to_owned()))?;
        match &mut children[index].kind {
            NodeKind::Directory { children: next } => children = next,
            NodeKind::File { .. } => return Err(FsError::NotFound(path.to_owned())),
        }
    }

    let index = find_child(children, name).map_err(|_| FsError::NotFound(path.to_owned()))?;
    match &mut children[index].kind {
        NodeKind::File { content: slot } => {
            *slot = Some(content);
            Ok(())
        }
        NodeKind::Directory { .. } => Err(FsError::NotAFile(path.to_owned())),
    }
}
