use std::fmt;
use std::path::{Path, PathBuf};

/// Marker that turns a watch pattern into a recursive one.
pub const WILDCARD: char = '*';

/// A directory selector for the watcher.
///
/// `"app"` watches exactly `app`. `"app/*"` watches `app` and every
/// directory beneath it. The wildcard is only special as the last
/// character; anywhere else it is part of the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WatchPattern {
    Exact(PathBuf),
    Recursive(PathBuf),
}

impl WatchPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix(WILDCARD) {
            Some(root) => Self::Recursive(PathBuf::from(root)),
            None => Self::Exact(PathBuf::from(pattern)),
        }
    }

    pub fn root(&self) -> &Path {
        match self {
            Self::Exact(path) | Self::Recursive(path) => path,
        }
    }

    pub fn is_recursive(&self) -> bool {
        matches!(self, Self::Recursive(_))
    }
}

impl From<&str> for WatchPattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

impl fmt::Display for WatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(path) => write!(f, "{}", path.display()),
            Self::Recursive(path) => write!(f, "{}{}", path.display(), WILDCARD),
        }
    }
}
