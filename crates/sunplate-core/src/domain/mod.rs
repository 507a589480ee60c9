// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Sunplate.
//!
//! This module contains pure logic with no I/O. Walking trees, reading
//! files and talking to the OS notification subsystem all happen behind the
//! ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async, no threads**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable values**: `RewriteRule`, `ModulePath`, `WatchPattern`
//! - **Ordered plans**: `ScaffoldPlan` keeps traversal order explicit
//!
pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{
    change_event::{ChangeKind, FileChangeEvent},
    module_path::{ModulePath, ResolvedModule},
    scaffold_plan::{EntryKind, ScaffoldEntry, ScaffoldPlan},
    watch_pattern::{WILDCARD, WatchPattern},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{DEFAULT_SOURCE_EXTENSION, RewriteRule, ScanPolicy, SourceExtensions};

pub use validation::DomainValidator;
