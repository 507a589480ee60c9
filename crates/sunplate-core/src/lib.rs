//! Sunplate Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Sunplate
//! developer tooling: materializing a new application from a skeleton tree,
//! and watching source directories to trigger rebuilds.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          sunplate-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, WatchCoordinator)    │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Driven: Filesystem, NotifierFactory)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    sunplate-adapters (Infrastructure)   │
//! │ (LocalFilesystem, NotifyWatcherFactory) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ScaffoldPlan, RewriteRule, ModulePath) │
//! │         No I/O, no threads              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sunplate_core::prelude::*;
//!
//! // 1. Scaffold a new application from the skeleton.
//! let rule = RewriteRule::new("github.com/anonx/sunplate/skeleton", "github.com/acme/widget")?;
//! let service = ScaffoldService::new(filesystem);
//! service.generate("skeleton", "widget", &rule)?;
//!
//! // 2. Rebuild whenever something under ./app changes.
//! let coordinator = WatchCoordinator::new(notifiers, filesystem);
//! let handle = coordinator.listen("./app/*", || rebuild())?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

/// The types most callers need.
pub mod prelude {
    pub use crate::application::{
        ScaffoldReport, ScaffoldService, WatchCoordinator, WatchHandle,
        ports::{ChangeNotifier, Filesystem, NotifierError, NotifierFactory, TreeEntry},
    };
    pub use crate::domain::{
        ChangeKind, EntryKind, FileChangeEvent, ModulePath, ResolvedModule, RewriteRule,
        ScaffoldEntry, ScaffoldPlan, ScanPolicy, SourceExtensions, WatchPattern,
    };
    pub use crate::error::{SunplateError, SunplateResult};
}
