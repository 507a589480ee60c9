//! Application layer for Sunplate.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, WatchCoordinator)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer drives the domain layer through the ports. Pure
//! rules (classification, rewriting, pattern parsing) live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{ScaffoldReport, ScaffoldService, WatchCoordinator, WatchHandle, glob};

// Re-export port traits (for adapter implementation)
pub use ports::{ChangeNotifier, Filesystem, NotifierFactory};

pub use error::ApplicationError;
