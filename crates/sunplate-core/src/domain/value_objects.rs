use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Extension of the files whose content carries import paths.
pub const DEFAULT_SOURCE_EXTENSION: &str = "go";

// ============================================================================
// RewriteRule
// ============================================================================

/// A literal `old -> new` substitution applied to every source file of a
/// skeleton.
///
/// Substitution is literal replacement over the whole file's bytes. Every
/// occurrence of `old_token` is replaced, there is no anchoring and no regex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RewriteRule {
    old_token: String,
    new_token: String,
}

impl RewriteRule {
    /// Build a rule. `old_token` must not be empty.
    pub fn new(
        old_token: impl Into<String>,
        new_token: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let old_token = old_token.into();
        if old_token.is_empty() {
            return Err(DomainError::InvalidRewriteRule(
                "the token to replace cannot be empty".into(),
            ));
        }

        Ok(Self {
            old_token,
            new_token: new_token.into(),
        })
    }

    pub fn old_token(&self) -> &str {
        &self.old_token
    }

    pub fn new_token(&self) -> &str {
        &self.new_token
    }

    /// Replace every occurrence of the old token in `content`.
    ///
    /// Works on raw bytes, so sources need not be valid UTF-8.
    pub fn apply(&self, content: &[u8]) -> Vec<u8> {
        let old = self.old_token.as_bytes();
        let mut out = Vec::with_capacity(content.len());
        let mut rest = content;
        while let Some(at) = find(rest, old) {
            out.extend_from_slice(&rest[..at]);
            out.extend_from_slice(self.new_token.as_bytes());
            rest = &rest[at + old.len()..];
        }
        out.extend_from_slice(rest);
        out
    }

    /// Number of places [`Self::apply`] would touch.
    pub fn occurrences(&self, content: &[u8]) -> usize {
        let old = self.old_token.as_bytes();
        let mut count = 0;
        let mut rest = content;
        while let Some(at) = find(rest, old) {
            count += 1;
            rest = &rest[at + old.len()..];
        }
        count
    }
}

/// First non-overlapping position of `needle`, which is never empty.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

impl fmt::Display for RewriteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.old_token, self.new_token)
    }
}

// ============================================================================
// SourceExtensions
// ============================================================================

/// File extensions (without the leading dot) that classify a file as source.
///
/// Matching is exact and case-sensitive, the same way the toolchain treats
/// file suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceExtensions(Vec<String>);

impl SourceExtensions {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        list.dedup();
        Self(list)
    }

    /// `true` if `path` ends in one of the source extensions.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.0.iter().any(|known| known == ext))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for SourceExtensions {
    fn default() -> Self {
        Self::new([DEFAULT_SOURCE_EXTENSION])
    }
}

// ============================================================================
// ScanPolicy
// ============================================================================

/// How a recursive watch pattern treats non-directory entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanPolicy {
    /// The first file (or unreadable entry) ends the whole remaining scan.
    /// Directories that would have been visited afterwards are not watched.
    Truncate,
    /// Files are skipped and the scan carries on.
    #[default]
    SkipFiles,
}

impl ScanPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Truncate => "truncate",
            Self::SkipFiles => "skip-files",
        }
    }
}

impl fmt::Display for ScanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncate" => Ok(Self::Truncate),
            "skip-files" | "skip_files" | "skip" => Ok(Self::SkipFiles),
            other => Err(DomainError::UnknownScanPolicy(other.to_string())),
        }
    }
}
