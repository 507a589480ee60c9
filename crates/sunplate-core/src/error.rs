//! Root error of the core crate: domain validation failures and
//! application (filesystem, watch) failures behind one type.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Sunplate Core operations.
#[derive(Debug, Error, Clone)]
pub enum SunplateError {
    /// Errors from the domain layer (validation of inputs).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (filesystem and watch orchestration).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),
}

impl SunplateError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// `true` when the destination of a scaffold already existed.
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::AlreadyExists { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type SunplateResult<T> = Result<T, SunplateError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn already_exists_is_a_validation_error() {
        let err: SunplateError = ApplicationError::AlreadyExists {
            path: PathBuf::from("/tmp/widget"),
        }
        .into();

        assert!(err.is_already_exists());
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.suggestions().iter().any(|s| s.contains("/tmp/widget")));
    }

    #[test]
    fn filesystem_failure_is_internal() {
        let err: SunplateError = ApplicationError::FilesystemError {
            path: PathBuf::from("a.go"),
            reason: "denied".into(),
        }
        .into();

        assert!(!err.is_already_exists());
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn empty_rewrite_token_is_validation() {
        let err: SunplateError = DomainError::InvalidRewriteRule("empty".into()).into();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
