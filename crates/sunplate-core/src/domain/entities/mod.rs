pub mod change_event;
pub mod module_path;
pub mod scaffold_plan;
pub mod watch_pattern;

pub use crate::domain::DomainError;
pub use change_event::{ChangeKind, FileChangeEvent};
pub use module_path::{ModulePath, ResolvedModule};
pub use scaffold_plan::{EntryKind, ScaffoldEntry, ScaffoldPlan};
pub use watch_pattern::{WILDCARD, WatchPattern};
