//! Scripted change notifier for testing.
//!
//! Tests push events and errors through the factory; every live session
//! started from it receives them. Registration failures and start failures
//! can be injected.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

use sunplate_core::{
    application::{
        ApplicationError,
        ports::{ChangeNotifier, NotifierError, NotifierFactory},
    },
    domain::FileChangeEvent,
    error::SunplateResult,
};

/// Factory handing out [`ScriptedNotifier`] sessions.
///
/// Clones share state, so the test keeps one handle and gives another to
/// the coordinator.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNotifierFactory {
    state: Arc<Mutex<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    sessions: Vec<Session>,
    rejected: HashSet<PathBuf>,
    start_failure: Option<String>,
    watched: Vec<PathBuf>,
    stopped: usize,
}

#[derive(Debug)]
struct Session {
    events: Option<Sender<FileChangeEvent>>,
    errors: Option<Sender<NotifierError>>,
}

impl ScriptedNotifierFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `add_path` fail for this directory.
    pub fn reject_path(&self, path: impl Into<PathBuf>) -> &Self {
        self.state.lock().rejected.insert(path.into());
        self
    }

    /// Make every later `start` fail with `reason`.
    pub fn fail_start(&self, reason: impl Into<String>) -> &Self {
        self.state.lock().start_failure = Some(reason.into());
        self
    }

    /// Deliver an event to every live session.
    pub fn emit(&self, event: FileChangeEvent) {
        for session in &self.state.lock().sessions {
            if let Some(tx) = &session.events {
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Deliver a runtime error to every live session.
    pub fn emit_error(&self, error: NotifierError) {
        for session in &self.state.lock().sessions {
            if let Some(tx) = &session.errors {
                let _ = tx.send(error.clone());
            }
        }
    }

    /// Close every session's streams, as if the OS watcher died.
    pub fn disconnect(&self) {
        for session in &mut self.state.lock().sessions {
            session.events = None;
            session.errors = None;
        }
    }

    /// Directories successfully registered so far, in order.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.state.lock().watched.clone()
    }

    /// Number of sessions started.
    pub fn started(&self) -> usize {
        self.state.lock().sessions.len()
    }

    /// Number of sessions stopped.
    pub fn stopped(&self) -> usize {
        self.state.lock().stopped
    }
}

impl NotifierFactory for ScriptedNotifierFactory {
    fn start(&self) -> SunplateResult<Box<dyn ChangeNotifier>> {
        let mut state = self.state.lock();
        if let Some(reason) = &state.start_failure {
            return Err(ApplicationError::NotifierUnavailable {
                reason: reason.clone(),
            }
            .into());
        }

        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let (error_tx, error_rx) = crossbeam_channel::unbounded();
        let index = state.sessions.len();
        state.sessions.push(Session {
            events: Some(event_tx),
            errors: Some(error_tx),
        });

        Ok(Box::new(ScriptedNotifier {
            state: Arc::clone(&self.state),
            index,
            events: event_rx,
            errors: error_rx,
            stopped: false,
        }))
    }
}

/// One session started by [`ScriptedNotifierFactory`].
pub struct ScriptedNotifier {
    state: Arc<Mutex<ScriptState>>,
    index: usize,
    events: Receiver<FileChangeEvent>,
    errors: Receiver<NotifierError>,
    stopped: bool,
}

impl ChangeNotifier for ScriptedNotifier {
    fn add_path(&mut self, path: &Path) -> SunplateResult<()> {
        let mut state = self.state.lock();
        if self.stopped || state.rejected.contains(path) {
            return Err(ApplicationError::WatchRegistration {
                path: path.to_path_buf(),
                reason: "no such file or directory".into(),
            }
            .into());
        }
        state.watched.push(path.to_path_buf());
        Ok(())
    }

    fn events(&self) -> Receiver<FileChangeEvent> {
        self.events.clone()
    }

    fn errors(&self) -> Receiver<NotifierError> {
        self.errors.clone()
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        let mut state = self.state.lock();
        state.stopped += 1;
        if let Some(session) = state.sessions.get_mut(self.index) {
            session.events = None;
            session.errors = None;
        }
    }
}
