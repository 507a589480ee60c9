//! Watch pattern resolution.
//!
//! The only special character is a trailing `*`, meaning "this directory
//! and every directory beneath it". Individual files cannot be watched, so
//! resolution only ever yields directories.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::application::ports::Filesystem;
use crate::domain::{ScanPolicy, WatchPattern};

/// Resolve `pattern` into the directories to watch.
///
/// Exact patterns are returned verbatim without touching the filesystem.
/// Recursive patterns are scanned root first, in pre-order. Scan failures are
/// not reported to the caller; whatever was collected is returned.
pub fn resolve(pattern: &str, filesystem: &dyn Filesystem, policy: ScanPolicy) -> Vec<PathBuf> {
    match WatchPattern::parse(pattern) {
        WatchPattern::Exact(path) => vec![path],
        WatchPattern::Recursive(root) => scan_directories(&root, filesystem, policy),
    }
}

fn scan_directories(root: &Path, filesystem: &dyn Filesystem, policy: ScanPolicy) -> Vec<PathBuf> {
    let mut directories = Vec::new();

    for entry in filesystem.walk(root) {
        match entry {
            Ok(entry) if entry.is_dir => directories.push(entry.path),
            Ok(entry) => match policy {
                ScanPolicy::Truncate => {
                    debug!(
                        path = %entry.path.display(),
                        collected = directories.len(),
                        "Not a directory, scan stopped"
                    );
                    break;
                }
                ScanPolicy::SkipFiles => {}
            },
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Error while scanning watch pattern");
                if policy == ScanPolicy::Truncate {
                    break;
                }
            }
        }
    }

    directories
}
