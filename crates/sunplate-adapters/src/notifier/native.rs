//! Native OS change notification backed by the `notify` crate.

use std::path::Path;

use crossbeam_channel::{Receiver, Sender};
use notify::{
    Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::ModifyKind,
};
use tracing::{debug, trace};

use sunplate_core::{
    application::{
        ApplicationError,
        ports::{ChangeNotifier, NotifierError, NotifierFactory},
    },
    domain::{ChangeKind, FileChangeEvent},
    error::SunplateResult,
};

/// Starts one [`NotifyWatcher`] per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyWatcherFactory;

impl NotifyWatcherFactory {
    pub fn new() -> Self {
        Self
    }
}

impl NotifierFactory for NotifyWatcherFactory {
    fn start(&self) -> SunplateResult<Box<dyn ChangeNotifier>> {
        Ok(Box::new(NotifyWatcher::new()?))
    }
}

/// A live `RecommendedWatcher` whose output is forwarded onto channels.
pub struct NotifyWatcher {
    watcher: Option<RecommendedWatcher>,
    events: Receiver<FileChangeEvent>,
    errors: Receiver<NotifierError>,
}

impl NotifyWatcher {
    pub fn new() -> SunplateResult<Self> {
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let (error_tx, error_rx) = crossbeam_channel::unbounded();

        let watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| forward(res, &event_tx, &error_tx),
            Config::default(),
        )
        .map_err(|e| ApplicationError::NotifierUnavailable {
            reason: e.to_string(),
        })?;

        Ok(Self {
            watcher: Some(watcher),
            events: event_rx,
            errors: error_rx,
        })
    }
}

impl ChangeNotifier for NotifyWatcher {
    fn add_path(&mut self, path: &Path) -> SunplateResult<()> {
        let watcher = self
            .watcher
            .as_mut()
            .ok_or_else(|| ApplicationError::WatchRegistration {
                path: path.to_path_buf(),
                reason: "notifier already stopped".into(),
            })?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| {
                ApplicationError::WatchRegistration {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    fn events(&self) -> Receiver<FileChangeEvent> {
        self.events.clone()
    }

    fn errors(&self) -> Receiver<NotifierError> {
        self.errors.clone()
    }

    fn stop(&mut self) {
        // Dropping the watcher drops the handler and its senders.
        if self.watcher.take().is_some() {
            debug!("OS watcher released");
        }
    }
}

fn forward(
    res: Result<Event, notify::Error>,
    events: &Sender<FileChangeEvent>,
    errors: &Sender<NotifierError>,
) {
    match res {
        Ok(event) => {
            let kind = change_kind(&event.kind);
            for path in event.paths {
                trace!(path = %path.display(), ?kind, "OS event");
                // The receiving loop may be gone already.
                let _ = events.send(FileChangeEvent::new(path, kind));
            }
        }
        Err(e) => {
            let _ = errors.send(NotifierError::new(e.to_string()).with_paths(e.paths));
        }
    }
}

fn change_kind(kind: &EventKind) -> ChangeKind {
    match kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Remove(_) => ChangeKind::Removed,
        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
        EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Metadata,
        EventKind::Modify(_) => ChangeKind::Modified,
        _ => ChangeKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use notify::event::{CreateKind, DataChange, MetadataKind, RenameMode};

    use super::*;

    #[test]
    fn only_content_changes_map_to_modified() {
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            ChangeKind::Modified
        );
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Any)),
            ChangeKind::Modified
        );
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            ChangeKind::Renamed
        );
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))),
            ChangeKind::Metadata
        );
        assert_eq!(
            change_kind(&EventKind::Create(CreateKind::File)),
            ChangeKind::Created
        );
        assert_eq!(change_kind(&EventKind::Any), ChangeKind::Other);
    }

    #[test]
    fn forward_fans_out_paths() {
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let (error_tx, error_rx) = crossbeam_channel::unbounded();

        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path("a.go".into())
            .add_path("b.go".into());
        forward(Ok(event), &event_tx, &error_tx);
        forward(Err(notify::Error::generic("queue overflow")), &event_tx, &error_tx);

        let got: Vec<_> = event_rx.try_iter().map(|e| e.path).collect();
        assert_eq!(got, vec![PathBuf::from("a.go"), PathBuf::from("b.go")]);
        assert_eq!(error_rx.try_recv().unwrap().message, "queue overflow");
    }

    #[test]
    fn add_path_after_stop_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut watcher = NotifyWatcher::new().unwrap();
        watcher.stop();
        watcher.stop();

        assert!(watcher.add_path(tmp.path()).is_err());
    }
}
