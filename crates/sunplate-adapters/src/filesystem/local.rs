//! Local filesystem adapter using std::fs and walkdir.

use std::io;
use std::path::Path;

use walkdir::WalkDir;

use sunplate_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, TreeEntry, TreeWalk},
    },
    error::{SunplateError, SunplateResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        // A dangling symlink still occupies the name.
        path.symlink_metadata().is_ok()
    }

    fn walk(&self, root: &Path) -> TreeWalk {
        let root = root.to_path_buf();
        let walker = WalkDir::new(&root).sort_by_file_name().into_iter();

        Box::new(walker.map(move |entry| {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&root).to_path_buf();
                SunplateError::from(ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to scan: {}", e),
                })
            })?;

            let relative = entry
                .path()
                .strip_prefix(&root)
                .unwrap_or(entry.path())
                .to_path_buf();

            Ok(TreeEntry {
                path: entry.path().to_path_buf(),
                relative,
                is_dir: entry.file_type().is_dir(),
            })
        }))
    }

    fn create_dir_all(&self, path: &Path) -> SunplateResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> SunplateResult<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(to, e, "copy file"))
    }

    fn read(&self, path: &Path) -> SunplateResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> SunplateResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> SunplateError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
