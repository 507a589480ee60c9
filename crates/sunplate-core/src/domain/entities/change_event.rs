use std::path::PathBuf;

/// Kind of change reported by the OS notification subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// File content was written.
    Modified,
    Created,
    Removed,
    Renamed,
    /// Permissions, timestamps and similar.
    Metadata,
    Other,
}

impl ChangeKind {
    /// Only content writes trigger a rebuild.
    pub fn is_write(self) -> bool {
        matches!(self, Self::Modified)
    }
}

/// A single `(path, kind)` change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl FileChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Modified)
    }

    pub fn requires_rebuild(&self) -> bool {
        self.kind.is_write()
    }
}
