use super::EntryKind;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeKind {
    Directory { children: Vec<TreeNode> },
    File { content: Option<String> },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeNode {
    pub name: String,
    /// `/`-joined path from the root, without a leading slash.
    pub path: String,
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File { content: None },
        }
    }

    pub fn entry_kind(&self) -> EntryKind {
        match self.kind {
            NodeKind::Directory { .. } => EntryKind::Directory,
            NodeKind::File { .. } => EntryKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn children(&self) -> Option<&[TreeNode]> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => content.as_deref(),
            NodeKind::Directory { .. } => None,
        }
    }

    fn count(&self) -> usize {
        1 + self
            .children()
            .map(|children| children.iter().map(TreeNode::count).sum())
            .unwrap_or(0)
    }
}

/// The in-memory repository. The root directory itself is never stored;
/// only its children are.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tree {
    pub(crate) children: Vec<TreeNode>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top_level(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of stored nodes, excluding the synthetic root.
    pub fn node_count(&self) -> usize {
        self.children.iter().map(TreeNode::count).sum()
    }
}

/// Borrowed view of a resolved node. `Root` stands in for the synthetic
/// top-level directory.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Root(&'a Tree),
    Node(&'a TreeNode),
}

impl<'a> NodeRef<'a> {
    pub fn is_dir(&self) -> bool {
        match self {
            NodeRef::Root(_) => true,
            NodeRef::Node(node) => node.is_dir(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            NodeRef::Root(_) => EntryKind::Directory,
            NodeRef::Node(node) => node.entry_kind(),
        }
    }

    pub fn children(&self) -> Option<&'a [TreeNode]> {
        match self {
            NodeRef::Root(tree) => Some(tree.top_level()),
            NodeRef::Node(node) => node.children(),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            NodeRef::Root(_) => "",
            NodeRef::Node(node) => &node.name,
        }
    }

    pub fn path(&self) -> &'a str {
        match self {
            NodeRef::Root(_) => "",
            NodeRef::Node(node) => &node.path,
        }
    }

    /// Absolute form used for the working directory, e.g. `/` or `/src/lib`.
    pub fn display_path(&self) -> String {
        format!("/{}", self.path())
    }
}
