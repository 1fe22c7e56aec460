#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One row of a repository listing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepoEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl RepoEntry {
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }
}
