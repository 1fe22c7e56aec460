use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationStatus {
    Loading,
    Saving,
    Done,
    Error,
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OperationStatus::Loading => "loading",
            OperationStatus::Saving => "saving",
            OperationStatus::Done => "done",
            OperationStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// Last known fetch/save state of a single path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FileOperation {
    pub status: OperationStatus,
    /// Advisory only, 0..=100.
    pub progress: u8,
}
