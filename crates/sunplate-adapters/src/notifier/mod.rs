//! Change notifier adapters.

mod native;
mod scripted;

pub use native::{NotifyWatcher, NotifyWatcherFactory};
pub use scripted::{ScriptedNotifier, ScriptedNotifierFactory};
