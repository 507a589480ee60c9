use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{error::DomainError, value_objects::SourceExtensions};

/// What a skeleton entry becomes in the new application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Created as an empty directory.
    Directory,
    /// Copied byte for byte.
    StaticFile,
    /// Read as text, rewritten, then written.
    SourceFile,
}

/// One classified entry of a skeleton tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldEntry {
    pub kind: EntryKind,
    /// Path of the entry inside the skeleton, as visited.
    pub source_path: PathBuf,
    /// Path relative to the skeleton root. Empty for the root itself.
    pub relative_path: PathBuf,
}

impl ScaffoldEntry {
    /// Classify a visited entry.
    pub fn classify(
        source_path: impl Into<PathBuf>,
        relative_path: impl Into<PathBuf>,
        is_dir: bool,
        extensions: &SourceExtensions,
    ) -> Self {
        let source_path = source_path.into();
        let kind = if is_dir {
            EntryKind::Directory
        } else if extensions.matches(&source_path) {
            EntryKind::SourceFile
        } else {
            EntryKind::StaticFile
        };

        Self {
            kind,
            source_path,
            relative_path: relative_path.into(),
        }
    }

    /// `true` for the entry describing the skeleton root.
    pub fn is_root(&self) -> bool {
        self.relative_path.as_os_str().is_empty()
    }

    /// Where this entry lands under `destination_root`.
    pub fn destination_in(&self, destination_root: &Path) -> PathBuf {
        if self.is_root() {
            destination_root.to_path_buf()
        } else {
            destination_root.join(&self.relative_path)
        }
    }
}

/// The classified content of a skeleton tree, in traversal order.
///
/// Entries are kept in the order the tree walk produced them (pre-order),
/// so a directory always precedes everything stored inside it.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldPlan {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<ScaffoldEntry>,
    #[serde(skip)]
    seen: HashSet<PathBuf>,
}

impl ScaffoldPlan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Append an entry, rejecting absolute and duplicate relative paths.
    pub fn push(&mut self, entry: ScaffoldEntry) -> Result<(), DomainError> {
        if entry.relative_path.is_absolute() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: entry.relative_path.display().to_string(),
            });
        }
        if !self.seen.insert(entry.relative_path.clone()) {
            return Err(DomainError::DuplicatePath {
                path: entry.relative_path.display().to_string(),
            });
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Validate the ordering invariant: the root comes first and is a
    /// directory, and every other entry follows its parent directory.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.entries.first() {
            Some(first) if first.is_root() && first.kind == EntryKind::Directory => {}
            _ => {
                return Err(DomainError::InvalidTemplateRoot {
                    path: self.root.clone(),
                });
            }
        }

        let mut directories: HashSet<&Path> = HashSet::new();
        for entry in &self.entries {
            if !entry.is_root() {
                let parent = entry.relative_path.parent().unwrap_or(Path::new(""));
                if !directories.contains(parent) {
                    return Err(DomainError::OrphanEntry {
                        path: entry.relative_path.display().to_string(),
                    });
                }
            }
            if entry.kind == EntryKind::Directory {
                directories.insert(entry.relative_path.as_path());
            }
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[ScaffoldEntry] {
        &self.entries
    }

    fn of_kind(&self, kind: EntryKind) -> impl Iterator<Item = &ScaffoldEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn directories(&self) -> impl Iterator<Item = &ScaffoldEntry> {
        self.of_kind(EntryKind::Directory)
    }

    pub fn static_files(&self) -> impl Iterator<Item = &ScaffoldEntry> {
        self.of_kind(EntryKind::StaticFile)
    }

    pub fn source_files(&self) -> impl Iterator<Item = &ScaffoldEntry> {
        self.of_kind(EntryKind::SourceFile)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
