//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create an application from the skeleton" or
//! "rebuild whenever a watched directory changes".

pub mod glob;
pub mod scaffold_service;
pub mod watch_coordinator;

pub use scaffold_service::{ScaffoldReport, ScaffoldService};
pub use watch_coordinator::{WatchCoordinator, WatchHandle};
