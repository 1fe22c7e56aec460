use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::{FileOperation, OperationStatus};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Loading,
    Saving,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Done,
    Error,
}

/// Per-path record of the most recent fetch or save.
///
/// Cloning shares the same records. The lock is only held for the map
/// update itself, so work on one path never waits on another.
#[derive(Clone, Default)]
pub struct FileOperationTracker {
    inner: Arc<Mutex<HashMap<String, FileOperation>>>,
}

impl FileOperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_start(&self, path: &str, phase: Phase) {
        let status = match phase {
            Phase::Loading => OperationStatus::Loading,
            Phase::Saving => OperationStatus::Saving,
        };
        self.inner.lock().insert(
            path.to_owned(),
            FileOperation {
                status,
                progress: 0,
            },
        );
    }

    pub fn record_progress(&self, path: &str, progress: u8) {
        if let Some(operation) = self.inner.lock().get_mut(path) {
            operation.progress = progress.min(100);
        }
    }

    pub fn record_result(&self, path: &str, outcome: Outcome) {
        let mut inner = self.inner.lock();
        let previous = inner.get(path).map(|op| op.progress).unwrap_or(0);
        let operation = match outcome {
            Outcome::Done => FileOperation {
                status: OperationStatus::Done,
                progress: 100,
            },
            Outcome::Error => FileOperation {
                status: OperationStatus::Error,
                progress: previous,
            },
        };
        inner.insert(path.to_owned(), operation);
    }

    pub fn get(&self, path: &str) -> Option<FileOperation> {
        self.inner.lock().get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
