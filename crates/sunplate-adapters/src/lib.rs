//! Infrastructure adapters for Sunplate.
//!
//! This crate implements the ports defined in `sunplate-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod notifier;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use notifier::{NotifyWatcherFactory, ScriptedNotifierFactory};
