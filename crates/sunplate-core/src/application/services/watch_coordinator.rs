//! Watch Coordinator - runs a callback whenever a watched directory changes.
//!
//! Every [`WatchCoordinator::listen`] call resolves its pattern, starts its
//! own change notifier and spawns one monitoring thread. All threads of a
//! coordinator share a single lock around the callback, so no two callbacks
//! run at the same time. Repeated triggers are not coalesced: a burst of N
//! writes runs the callback N times, one after another.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError, never, select};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ChangeNotifier, Filesystem, NotifierFactory},
        services::glob,
    },
    domain::{FileChangeEvent, ScanPolicy},
    error::SunplateResult,
};

/// Coordinates monitoring loops and serializes their callbacks.
///
/// Loops stop when [`Self::shutdown`] is called or the coordinator is
/// dropped.
pub struct WatchCoordinator {
    notifiers: Box<dyn NotifierFactory>,
    filesystem: Box<dyn Filesystem>,
    policy: ScanPolicy,
    lock: Arc<Mutex<()>>,
    invocations: Arc<AtomicUsize>,
    shutdown_tx: Mutex<Option<Sender<()>>>,
    shutdown_rx: Receiver<()>,
}

impl WatchCoordinator {
    pub fn new(notifiers: Box<dyn NotifierFactory>, filesystem: Box<dyn Filesystem>) -> Self {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(0);
        Self {
            notifiers,
            filesystem,
            policy: ScanPolicy::default(),
            lock: Arc::new(Mutex::new(())),
            invocations: Arc::new(AtomicUsize::new(0)),
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            shutdown_rx,
        }
    }

    /// Choose how recursive patterns treat plain files.
    pub fn with_scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn scan_policy(&self) -> ScanPolicy {
        self.policy
    }

    /// Start monitoring the directories selected by `pattern`.
    ///
    /// Returns as soon as the monitoring thread is running. Directories that
    /// cannot be registered are logged and skipped.
    #[instrument(skip(self, callback))]
    pub fn listen<F>(&self, pattern: &str, callback: F) -> SunplateResult<WatchHandle>
    where
        F: FnMut() + Send + 'static,
    {
        let directories = glob::resolve(pattern, self.filesystem.as_ref(), self.policy);
        let mut notifier = self.notifiers.start()?;

        let mut registered = 0;
        for dir in &directories {
            trace!(path = %dir.display(), "Adding directory to the watch list");
            match notifier.add_path(dir) {
                Ok(()) => registered += 1,
                Err(e) => warn!(path = %dir.display(), error = %e, "Cannot watch directory"),
            }
        }
        info!(
            resolved = directories.len(),
            registered, "Watching for changes"
        );

        let monitor = Monitor {
            events: notifier.events(),
            errors: notifier.errors(),
            notifier,
            shutdown: self.shutdown_rx.clone(),
            lock: Arc::clone(&self.lock),
            invocations: Arc::clone(&self.invocations),
        };

        let thread = thread::Builder::new()
            .name("sunplate-watch".into())
            .spawn(move || monitor.run(callback))
            .map_err(|e| ApplicationError::NotifierUnavailable {
                reason: format!("cannot spawn monitoring thread: {e}"),
            })?;

        Ok(WatchHandle {
            pattern: pattern.to_string(),
            directories,
            registered,
            thread,
        })
    }

    /// Ask every monitoring loop to stop. Safe to call more than once.
    pub fn shutdown(&self) {
        if self.shutdown_tx.lock().take().is_some() {
            debug!("Watch coordinator shutting down");
        }
    }

    /// Number of callbacks run so far, across all loops.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

/// A running monitoring loop started by [`WatchCoordinator::listen`].
#[derive(Debug)]
pub struct WatchHandle {
    pattern: String,
    directories: Vec<PathBuf>,
    registered: usize,
    thread: JoinHandle<()>,
}

impl WatchHandle {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Directories the pattern resolved to.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// How many of them were accepted by the notifier.
    pub fn registered(&self) -> usize {
        self.registered
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the loop ends.
    pub fn join(self) -> SunplateResult<()> {
        self.thread.join().map_err(|_| {
            ApplicationError::WatchLoopPanicked {
                pattern: self.pattern,
            }
            .into()
        })
    }
}

struct Monitor {
    notifier: Box<dyn ChangeNotifier>,
    events: Receiver<FileChangeEvent>,
    errors: Receiver<crate::application::ports::NotifierError>,
    shutdown: Receiver<()>,
    lock: Arc<Mutex<()>>,
    invocations: Arc<AtomicUsize>,
}

impl Monitor {
    fn run<F: FnMut()>(mut self, mut callback: F) {
        let mut errors = self.errors.clone();
        loop {
            let mut errors_closed = false;
            select! {
                recv(self.events) -> msg => match msg {
                    Ok(event) if event.requires_rebuild() => {
                        let _guard = self.lock.lock();
                        // Shutdown wins over a backlog of ready events.
                        if self.stopping() {
                            break;
                        }
                        debug!(path = %event.path.display(), "Change detected");
                        callback();
                        self.invocations.fetch_add(1, Ordering::SeqCst);
                    }
                    Ok(event) => {
                        trace!(path = %event.path.display(), kind = ?event.kind, "Ignoring event");
                    }
                    Err(_) => {
                        debug!("Event stream closed");
                        break;
                    }
                },
                recv(errors) -> msg => match msg {
                    Ok(err) => warn!(error = %err, "Change notifier error"),
                    Err(_) => errors_closed = true,
                },
                recv(self.shutdown) -> _ => break,
            }
            // A closed error stream would otherwise be ready forever.
            if errors_closed {
                errors = never();
            }
        }

        self.notifier.stop();
        debug!("Monitoring loop stopped");
    }

    /// Nothing is ever sent on the shutdown channel; it only disconnects.
    fn stopping(&self) -> bool {
        matches!(self.shutdown.try_recv(), Err(TryRecvError::Disconnected))
    }
}
