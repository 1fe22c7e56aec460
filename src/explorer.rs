use std::collections::BTreeSet;

use tracing::debug;

use crate::core::{FileOperationTracker, Outcome, Phase, resolve};
use crate::error::{FsError, OperationError};
use crate::models::{NodeRef, Tree};

/// Click-to-open state of one file explorer: which folders are expanded,
/// which file is selected and what is shown for it.
#[derive(Debug, Default)]
pub struct Explorer {
    expanded: BTreeSet<String>,
    selected: Option<String>,
    content: Option<String>,
    error: Option<String>,
    generation: u64,
}

/// Handed out when a file is opened and redeemed when its fetch finishes.
/// A ticket from an earlier selection is stale and its result is dropped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FetchTicket {
    path: String,
    generation: u64,
}

impl FetchTicket {
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum Click {
    Toggled { path: String, expanded: bool },
    Opened(FetchTicket),
}

impl Explorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directories toggle, files become the selection and need a fetch.
    pub fn click(
        &mut self,
        tree: &Tree,
        tracker: &FileOperationTracker,
        path: &str,
    ) -> Result<Click, FsError> {
        let node = resolve(tree, "/", path).ok_or_else(|| FsError::NotFound(path.to_owned()))?;
        match node {
            NodeRef::Root(_) => Ok(Click::Toggled {
                path: String::new(),
                expanded: true,
            }),
            NodeRef::Node(node) if node.is_dir() => {
                let expanded = self.toggle(&node.path);
                Ok(Click::Toggled {
                    path: node.path.clone(),
                    expanded,
                })
            }
            NodeRef::Node(node) => {
                self.generation += 1;
                self.selected = Some(node.path.clone());
                self.content = None;
                self.error = None;
                tracker.record_start(&node.path, Phase::Loading);
                Ok(Click::Opened(FetchTicket {
                    path: node.path.clone(),
                    generation: self.generation,
                }))
            }
        }
    }

    /// Flip the expanded flag of `path` and return the new state.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_owned());
            true
        }
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drop the selection. Any fetch still in flight becomes stale.
    pub fn deselect(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.content = None;
        self.error = None;
    }

    /// Apply a finished fetch. Returns false, touching nothing, when the
    /// ticket no longer matches the current selection.
    pub fn complete(
        &mut self,
        tracker: &FileOperationTracker,
        ticket: &FetchTicket,
        result: Result<String, OperationError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(path = %ticket.path, "discarding stale fetch result");
            return false;
        }

        match result {
            Ok(content) => {
                tracker.record_result(&ticket.path, Outcome::Done);
                self.content = Some(content);
                self.error = None;
            }
            Err(err) => {
                tracker.record_result(&ticket.path, Outcome::Error);
                self.content = None;
                self.error = Some(err.to_string());
            }
        }
        true
    }
}
