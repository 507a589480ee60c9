//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `sunplate-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crossbeam_channel::Receiver;
use thiserror::Error;

use crate::domain::FileChangeEvent;
use crate::error::SunplateResult;

/// One entry produced by [`Filesystem::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path as visited (the walk root joined with the relative path).
    pub path: PathBuf,
    /// Path relative to the walk root. Empty for the root itself.
    pub relative: PathBuf,
    pub is_dir: bool,
}

/// Lazily produced tree walk. Consumers may stop early.
pub type TreeWalk = Box<dyn Iterator<Item = SunplateResult<TreeEntry>> + Send>;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `sunplate_adapters::filesystem::LocalFilesystem` (production)
/// - `sunplate_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Walk the tree rooted at `root`, root first, pre-order, with the
    /// children of each directory sorted by file name.
    ///
    /// An unreadable root is reported as the first (and only) item.
    fn walk(&self, root: &Path) -> TreeWalk;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SunplateResult<()>;

    /// Copy a file byte for byte.
    fn copy_file(&self, from: &Path, to: &Path) -> SunplateResult<()>;

    /// Read a whole file. No encoding is assumed.
    fn read(&self, path: &Path) -> SunplateResult<Vec<u8>>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &[u8]) -> SunplateResult<()>;
}

/// Runtime error reported by a change notifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NotifierError {
    pub message: String,
    pub paths: Vec<PathBuf>,
}

impl NotifierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            paths: Vec::new(),
        }
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }
}

/// A running OS change-notification session.
///
/// Directories are registered one at a time and are not watched
/// recursively. Events and errors arrive on channels so a consumer can block
/// on both at once.
pub trait ChangeNotifier: Send {
    /// Start watching one directory.
    fn add_path(&mut self, path: &Path) -> SunplateResult<()>;

    /// Stream of change events. Disconnects once the notifier is stopped.
    fn events(&self) -> Receiver<FileChangeEvent>;

    /// Stream of runtime errors.
    fn errors(&self) -> Receiver<NotifierError>;

    /// Release OS resources. Idempotent.
    fn stop(&mut self);
}

/// Port that starts [`ChangeNotifier`] sessions.
///
/// Implemented by:
/// - `sunplate_adapters::notifier::NotifyWatcherFactory` (production)
/// - `sunplate_adapters::notifier::ScriptedNotifierFactory` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait NotifierFactory: Send + Sync {
    fn start(&self) -> SunplateResult<Box<dyn ChangeNotifier>>;
}
