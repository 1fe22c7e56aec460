mod entry;
mod operation;
mod tree;

pub use entry::{EntryKind, RepoEntry};
pub use operation::{FileOperation, OperationStatus};
pub use tree::{NodeKind, NodeRef, Tree, TreeNode};
