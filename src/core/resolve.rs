use crate::error::FsError;
use crate::models::{NodeRef, Tree};

use super::build::find_child;

/// Resolve `expr` against `cwd`.
///
/// Absolute expressions start at the root; anything else is joined onto
/// `cwd` first. Empty segments are dropped, `.` is a no-op and `..` pops one
/// level (never above the root). Descending through a file fails.
pub fn resolve<'a>(tree: &'a Tree, cwd: &str, expr: &str) -> Option<NodeRef<'a>> {
    let mut stack = vec![NodeRef::Root(tree)];

    if !expr.starts_with('/') {
        walk(&mut stack, cwd)?;
    }
    walk(&mut stack, expr)?;

    stack.last().copied()
}

fn walk<'a>(stack: &mut Vec<NodeRef<'a>>, expr: &str) -> Option<()> {
    for segment in expr.split('/').filter(|s| !s.is_empty()) {
        let current = *stack.last()?;
        let children = current.children()?;

        match segment {
            "." => {}
            ".." => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            name => {
                let index = find_child(children, name).ok()?;
                stack.push(NodeRef::Node(&children[index]));
            }
        }
    }
    Some(())
}

/// Resolve the target of a file creation into root-relative segments.
///
/// Parent segments are walked like `resolve`, except that a missing
/// directory is allowed and will be created. Walking through a file fails,
/// and so does `..` out of a directory that does not exist yet.
pub fn resolve_creation_path(tree: &Tree, cwd: &str, expr: &str) -> Result<Vec<String>, FsError> {
    let start = if expr.starts_with('/') { "" } else { cwd };
    let segments: Vec<&str> = start
        .split('/')
        .chain(expr.split('/'))
        .filter(|s| !s.is_empty())
        .collect();

    let Some((name, parents)) = segments.split_last() else {
        return Err(FsError::InvalidPath(expr.to_owned()));
    };
    if *name == "." || *name == ".." {
        return Err(FsError::InvalidPath(expr.to_owned()));
    }

    // `None` marks a directory that will be created.
    let mut stack: Vec<Option<NodeRef<'_>>> = vec![Some(NodeRef::Root(tree))];
    let mut names: Vec<String> = Vec::new();

    for segment in parents {
        let current = stack.last().copied().flatten();
        if let Some(node) = current
            && !node.is_dir()
        {
            return Err(FsError::NotADirectory(node.path().to_owned()));
        }

        match *segment {
            "." => {}
            ".." => {
                if current.is_none() {
                    return Err(FsError::NotFound(expr.to_owned()));
                }
                if stack.len() > 1 {
                    stack.pop();
                    names.pop();
                }
            }
            child => {
                let next = current.and_then(|node| {
                    let children = node.children()?;
                    let index = find_child(children, child).ok()?;
                    Some(NodeRef::Node(&children[index]))
                });
                stack.push(next);
                names.push(child.to_owned());
            }
        }
    }

    if let Some(Some(node)) = stack.last()
        && !node.is_dir()
    {
        return Err(FsError::NotADirectory(node.path().to_owned()));
    }

    names.push((*name).to_owned());
    Ok(names)
}

/// Lexically normalize `expr` against `cwd` into root-relative segments,
/// without consulting the tree.
pub fn normalize(cwd: &str, expr: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    let start = if expr.starts_with('/') { "" } else { cwd };

    for segment in start.split('/').chain(expr.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name.to_owned()),
        }
    }
    segments
}

/// `/`-prefixed form of a segment list; the root is `/`.
pub fn display_path<S: AsRef<str>>(segments: &[S]) -> String {
    let joined: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
    format!("/{}", joined.join("/"))
}

/// The working directory one level up; `/` stays `/`.
pub fn parent_dir(cwd: &str) -> String {
    let mut segments = normalize("/", cwd);
    segments.pop();
    display_path(&segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::build::{BuildOptions, build_tree};
    use crate::models::{EntryKind, RepoEntry};

    fn sample() -> Tree {
        build_tree(
            vec![
                RepoEntry::file("README.md"),
                RepoEntry::file("src/main.rs"),
                RepoEntry::file("src/core/walk.rs"),
                RepoEntry::dir("docs"),
            ],
            &BuildOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn root_forms_resolve_to_synthetic_root() {
        let tree = sample();
        for expr in ["", "/", "//", "/.", "/..", "/src/.."] {
            let node = resolve(&tree, "/", expr).unwrap();
            assert!(matches!(node, NodeRef::Root(_)), "{expr}");
            assert_eq!(node.display_path(), "/");
            assert_eq!(node.children().unwrap().len(), 3);
        }
    }

    #[test]
    fn relative_paths_join_cwd() {
        let tree = sample();
        let node = resolve(&tree, "/src", "core/walk.rs").unwrap();
        assert_eq!(node.path(), "src/core/walk.rs");
        assert_eq!(node.kind(), EntryKind::File);

        let node = resolve(&tree, "/src/core", "../main.rs").unwrap();
        assert_eq!(node.path(), "src/main.rs");

        let node = resolve(&tree, "/src/core", "./").unwrap();
        assert_eq!(node.path(), "src/core");
    }

    #[test]
    fn absolute_paths_ignore_cwd() {
        let tree = sample();
        let node = resolve(&tree, "/src/core", "/README.md").unwrap();
        assert_eq!(node.path(), "README.md");
    }

    #[test]
    fn dot_dot_never_climbs_above_root() {
        let tree = sample();
        let node = resolve(&tree, "/", "../../src").unwrap();
        assert_eq!(node.path(), "src");
    }

    #[test]
    fn cannot_descend_into_a_file() {
        let tree = sample();
        assert!(resolve(&tree, "/", "README.md/x").is_none());
        assert!(resolve(&tree, "/", "README.md/..").is_none());
        assert!(resolve(&tree, "/", "README.md/").is_some());
    }

    #[test]
    fn missing_paths_are_not_found() {
        let tree = sample();
        assert!(resolve(&tree, "/", "missing.txt").is_none());
        assert!(resolve(&tree, "/docs", "main.rs").is_none());
    }

    #[test]
    fn parent_of_every_multi_segment_path_is_a_directory() {
        let tree = sample();
        for path in ["src/main.rs", "src/core/walk.rs", "src/core"] {
            assert!(resolve(&tree, "/", path).is_some());
            let mut segments = normalize("/", path);
            segments.pop();
            let parent = resolve(&tree, "/", &display_path(&segments)).unwrap();
            assert!(parent.is_dir(), "{path}");
        }
    }

    #[test]
    fn creation_path_walks_existing_and_missing_parents() {
        let tree = sample();
        assert_eq!(
            resolve_creation_path(&tree, "/src", "core/../new.rs").unwrap(),
            vec!["src", "new.rs"]
        );
        assert_eq!(
            resolve_creation_path(&tree, "/", "x/./y/z.txt").unwrap(),
            vec!["x", "y", "z.txt"]
        );
        assert_eq!(
            resolve_creation_path(&tree, "/docs", "/../top.txt").unwrap(),
            vec!["top.txt"]
        );
    }

    #[test]
    fn creation_path_cannot_pass_through_a_file_or_missing_directory() {
        let tree = sample();
        assert_eq!(
            resolve_creation_path(&tree, "/", "README.md/../x"),
            Err(FsError::NotADirectory("README.md".to_owned()))
        );
        assert_eq!(
            resolve_creation_path(&tree, "/", "src/main.rs/x"),
            Err(FsError::NotADirectory("src/main.rs".to_owned()))
        );
        assert_eq!(
            resolve_creation_path(&tree, "/", "nope/../x"),
            Err(FsError::NotFound("nope/../x".to_owned()))
        );
        assert!(matches!(
            resolve_creation_path(&tree, "/", "src/.."),
            Err(FsError::InvalidPath(_))
        ));
        assert!(matches!(
            resolve_creation_path(&tree, "/", "/"),
            Err(FsError::InvalidPath(_))
        ));
    }

    #[test]
    fn normalize_handles_dots_and_slashes() {
        assert_eq!(normalize("/a/b", "../c//d/."), vec!["a", "c", "d"]);
        assert_eq!(normalize("/a", "/x/../y"), vec!["y"]);
        assert!(normalize("/", "../..").is_empty());
    }

    #[test]
    fn parent_dir_pops_one_level() {
        assert_eq!(parent_dir("/a/b"), "/a");
        assert_eq!(parent_dir("/a"), "/");
        assert_eq!(parent_dir("/"), "/");
    }
}
