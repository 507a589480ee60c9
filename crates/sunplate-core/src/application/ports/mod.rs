//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `sunplate-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: Tree walking and file operations
//!   - `NotifierFactory` / `ChangeNotifier`: OS change notification
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ChangeNotifier, Filesystem, NotifierError, NotifierFactory, TreeEntry, TreeWalk,
};

#[cfg(test)]
pub use output::{MockFilesystem, MockNotifierFactory};
