//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;

use sunplate_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, TreeEntry, TreeWalk},
    },
    error::{SunplateError, SunplateResult},
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep one handle for
/// inspection while the service under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    failing_writes: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory and its ancestors (testing helper).
    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        self.inner.write().insert_dir_all(path.as_ref());
        self
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> &Self {
        let path = path.as_ref();
        let mut inner = self.inner.write();
        if let Some(parent) = path.parent() {
            inner.insert_dir_all(parent);
        }
        inner.files.insert(path.to_path_buf(), content.into());
        self
    }

    /// Make every later write or copy to `path` fail.
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) -> &Self {
        self.inner
            .write()
            .failing_writes
            .insert(path.as_ref().to_path_buf());
        self
    }

    /// Read a file's content as text, lossily (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read_bytes(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read a file's raw content (testing helper).
    pub fn read_bytes(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.inner.read().files.get(path.as_ref()).cloned()
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.inner.read().directories.contains(path.as_ref())
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner.read().files.keys().cloned().collect()
    }
}

impl MemoryFilesystemInner {
    fn insert_dir_all(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn check_writable(&self, path: &Path, operation: &str) -> SunplateResult<()> {
        if self.failing_writes.contains(path) {
            return Err(fs_error(path, format!("Failed to {}: injected failure", operation)));
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.directories.contains(parent) => {
                Err(fs_error(path, "Parent directory does not exist"))
            }
            _ => Ok(()),
        }
    }

    fn entry(&self, root: &Path, path: &Path, is_dir: bool) -> TreeEntry {
        TreeEntry {
            path: path.to_path_buf(),
            relative: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            is_dir,
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn walk(&self, root: &Path) -> TreeWalk {
        let inner = self.inner.read();

        if inner.files.contains_key(root) {
            let only = Ok(inner.entry(root, root, false));
            return Box::new(std::iter::once(only));
        }
        if !inner.directories.contains(root) {
            let err = Err(fs_error(root, "Failed to scan: No such file or directory"));
            return Box::new(std::iter::once(err));
        }

        // Component-wise path ordering is exactly a sorted pre-order walk.
        let mut items: BTreeMap<PathBuf, bool> = BTreeMap::new();
        for dir in inner.directories.iter().filter(|d| d.starts_with(root)) {
            items.insert(dir.clone(), true);
        }
        for file in inner.files.keys().filter(|f| f.starts_with(root)) {
            items.insert(file.clone(), false);
        }

        let entries: Vec<SunplateResult<TreeEntry>> = items
            .into_iter()
            .map(|(path, is_dir)| Ok(inner.entry(root, &path, is_dir)))
            .collect();
        Box::new(entries.into_iter())
    }

    fn create_dir_all(&self, path: &Path) -> SunplateResult<()> {
        let mut inner = self.inner.write();
        if inner.files.contains_key(path) {
            return Err(fs_error(path, "Failed to create directory: File exists"));
        }
        inner.insert_dir_all(path);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> SunplateResult<()> {
        let mut inner = self.inner.write();
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| fs_error(from, "Failed to copy file: No such file"))?;
        inner.check_writable(to, "copy file")?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn read(&self, path: &Path) -> SunplateResult<Vec<u8>> {
        self.inner
            .read()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| fs_error(path, "Failed to read file: No such file"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> SunplateResult<()> {
        let mut inner = self.inner.write();
        inner.check_writable(path, "write file")?;
        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }
}

fn fs_error(path: &Path, reason: impl Into<String>) -> SunplateError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_matches_sorted_preorder() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/t/b/inner/x.go", "x")
            .add_file("/t/a-b.txt", "y")
            .add_file("/t/a/z.txt", "z");

        let relatives: Vec<PathBuf> = fs
            .walk(Path::new("/t"))
            .map(|e| e.unwrap().relative)
            .collect();

        assert_eq!(
            relatives,
            vec![
                PathBuf::new(),
                PathBuf::from("a"),
                PathBuf::from("a/z.txt"),
                PathBuf::from("a-b.txt"),
                PathBuf::from("b"),
                PathBuf::from("b/inner"),
                PathBuf::from("b/inner/x.go"),
            ]
        );
    }

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/out/a.go"), b"x").is_err());

        fs.create_dir_all(Path::new("/out")).unwrap();
        fs.write_file(Path::new("/out/a.go"), b"x").unwrap();
        assert_eq!(fs.read_file("/out/a.go").as_deref(), Some("x"));
    }

    #[test]
    fn injected_failure_rejects_write() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/out").fail_writes_to("/out/a.go");

        let err = fs.write_file(Path::new("/out/a.go"), b"x").unwrap_err();
        assert!(err.to_string().contains("injected failure"));
        assert!(!fs.exists(Path::new("/out/a.go")));
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/srv/app");
        assert!(fs.exists(Path::new("/srv/app/")));
    }
}
