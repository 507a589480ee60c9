use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside `SunplateError`)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid rewrite rule: {0}")]
    InvalidRewriteRule(String),

    #[error("Invalid module path '{path}': {reason}")]
    InvalidModulePath { path: String, reason: String },

    #[error("Template root is not a directory: {path}")]
    InvalidTemplateRoot { path: PathBuf },

    #[error("Duplicate path in scaffold plan: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("'{path}' is listed before its parent directory")]
    OrphanEntry { path: String },

    #[error("Unknown scan policy '{0}'")]
    UnknownScanPolicy(String),

    #[error("{path} is outside of the workspace {root}")]
    OutsideWorkspace { path: PathBuf, root: PathBuf },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidRewriteRule(msg) => vec![
                format!("Details: {}", msg),
                "Pass the skeleton's import path with --from-import".into(),
            ],
            Self::InvalidModulePath { path, .. } => vec![
                format!("'{}' cannot be used as an import path", path),
                "Examples: github.com/acme/widget, ./widget, ../acme/widget".into(),
            ],
            Self::OutsideWorkspace { root, .. } => vec![
                format!("New applications must live under {}", root.display()),
                "Set GOPATH or pass --workspace to choose another root".into(),
            ],
            Self::InvalidTemplateRoot { path } => vec![
                format!("Skeleton path: {}", path.display()),
                "Point --template at the skeleton directory".into(),
            ],
            Self::UnknownScanPolicy(_) => {
                vec!["Supported scan policies: truncate, skip-files".into()]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRewriteRule(_)
            | Self::InvalidModulePath { .. }
            | Self::OutsideWorkspace { .. }
            | Self::UnknownScanPolicy(_) => ErrorCategory::Validation,
            Self::InvalidTemplateRoot { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
