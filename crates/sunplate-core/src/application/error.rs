//! Application layer errors.
//!
//! These errors represent failures in orchestration (filesystem work, change
//! notification), not input validation. Validation errors are `DomainError`
//! from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Scaffold destination exists already. Nothing was written.
    #[error("Destination already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Filesystem operation failed. Work done before the failure stays on
    /// disk.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The OS change notification subsystem could not be started.
    #[error("Change notifier unavailable: {reason}")]
    NotifierUnavailable { reason: String },

    /// A single directory could not be registered for watching.
    #[error("Cannot watch {path}: {reason}")]
    WatchRegistration { path: PathBuf, reason: String },

    /// A monitoring loop ended abnormally (its callback panicked).
    #[error("Watch loop for '{pattern}' terminated abnormally")]
    WatchLoopPanicked { pattern: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AlreadyExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different import path".into(),
                format!("Or remove the existing directory: rm -rf {}", path.display()),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read and write permissions".into(),
                "Files written before the failure were left in place".into(),
            ],
            Self::NotifierUnavailable { .. } => vec![
                "The OS file notification service could not be started".into(),
                "On Linux, check fs.inotify.max_user_instances".into(),
            ],
            Self::WatchRegistration { path, .. } => vec![
                format!("Check that {} exists and is a directory", path.display()),
                "On Linux, check fs.inotify.max_user_watches".into(),
            ],
            Self::WatchLoopPanicked { .. } => {
                vec!["The rebuild callback panicked, see the log above".into()]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyExists { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::NotifierUnavailable { .. } => ErrorCategory::Configuration,
            Self::WatchRegistration { .. } => ErrorCategory::NotFound,
            Self::WatchLoopPanicked { .. } => ErrorCategory::Internal,
        }
    }
}
