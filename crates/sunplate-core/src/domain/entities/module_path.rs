use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::domain::error::DomainError;

/// Import path of an application, relative to the workspace root
/// (e.g. `github.com/acme/widget`). Always `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModulePath(String);

/// A module path together with the directory it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub module: ModulePath,
    pub directory: PathBuf,
}

impl ModulePath {
    /// Parse an import path such as `github.com/acme/widget`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidModulePath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(invalid("import path cannot be empty"));
        }
        if trimmed.contains('\\') {
            return Err(invalid("use '/' as the separator"));
        }
        if trimmed
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(invalid("empty, '.' and '..' segments are not allowed"));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Import path of `dir`, which must sit inside `workspace_root`.
    pub fn of_dir(dir: &Path, workspace_root: &Path) -> Result<Self, DomainError> {
        let dir = normalize(dir);
        let root = normalize(workspace_root);

        let relative = dir
            .strip_prefix(&root)
            .map_err(|_| DomainError::OutsideWorkspace {
                path: dir.clone(),
                root: root.clone(),
            })?;

        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        Self::parse(&joined)
    }

    /// Resolve a user argument into a module path and its directory.
    ///
    /// Arguments starting with `.` or given as absolute paths name a
    /// directory, which must be inside `workspace_root`. Anything else is
    /// taken as an import path and placed under `workspace_root`.
    pub fn resolve(
        argument: &str,
        cwd: &Path,
        workspace_root: &Path,
    ) -> Result<ResolvedModule, DomainError> {
        let as_path = Path::new(argument);

        if argument.starts_with('.') || as_path.is_absolute() {
            let directory = normalize(&cwd.join(as_path));
            let module = Self::of_dir(&directory, workspace_root)?;
            return Ok(ResolvedModule { module, directory });
        }

        let module = Self::parse(argument)?;
        let directory = normalize(workspace_root).join(module.to_relative_path());
        Ok(ResolvedModule { module, directory })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The import path as a platform path.
    pub fn to_relative_path(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lexically drop `.` and resolve `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
