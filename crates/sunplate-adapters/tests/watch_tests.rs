//! Watch coordinator behaviour with scripted and native notifiers.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use sunplate_adapters::{
    LocalFilesystem, MemoryFilesystem, NotifyWatcherFactory, ScriptedNotifierFactory,
};
use sunplate_core::{
    application::{ApplicationError, WatchCoordinator, ports::NotifierError},
    domain::{ChangeKind, FileChangeEvent, ScanPolicy},
    error::SunplateError,
};

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

fn scripted_coordinator(factory: &ScriptedNotifierFactory) -> WatchCoordinator {
    WatchCoordinator::new(Box::new(factory.clone()), Box::new(MemoryFilesystem::new()))
}

#[test]
fn callbacks_never_overlap_across_loops() {
    const BURST: usize = 20;

    let factory = ScriptedNotifierFactory::new();
    let coordinator = scripted_coordinator(&factory);

    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let make_callback = || {
        let active = Arc::clone(&active);
        let peak = Arc::clone(&peak);
        move || {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            active.fetch_sub(1, Ordering::SeqCst);
        }
    };

    let first = coordinator.listen("app", make_callback()).unwrap();
    let second = coordinator.listen("lib", make_callback()).unwrap();
    assert_eq!(factory.started(), 2);

    // Every session receives every event, so each burst runs both loops.
    for i in 0..BURST {
        factory.emit(FileChangeEvent::modified(format!("app/{i}.go")));
    }

    assert!(wait_until(Duration::from_secs(10), || {
        coordinator.invocations() == 2 * BURST
    }));
    assert_eq!(peak.load(Ordering::SeqCst), 1);

    coordinator.shutdown();
    first.join().unwrap();
    second.join().unwrap();
    assert_eq!(factory.stopped(), 2);
}

#[test]
fn only_writes_trigger_the_callback() {
    let factory = ScriptedNotifierFactory::new();
    let coordinator = scripted_coordinator(&factory);
    let handle = coordinator.listen("app", || {}).unwrap();

    for kind in [
        ChangeKind::Created,
        ChangeKind::Removed,
        ChangeKind::Renamed,
        ChangeKind::Metadata,
        ChangeKind::Other,
    ] {
        factory.emit(FileChangeEvent::new("app/main.go", kind));
    }
    factory.emit(FileChangeEvent::modified("app/main.go"));

    // Events of one loop are handled in order, so the write comes last.
    assert!(wait_until(Duration::from_secs(5), || {
        coordinator.invocations() == 1
    }));

    coordinator.shutdown();
    handle.join().unwrap();
    assert_eq!(coordinator.invocations(), 1);
}

#[test]
fn notifier_errors_do_not_stop_the_loop() {
    let factory = ScriptedNotifierFactory::new();
    let coordinator = scripted_coordinator(&factory);
    let handle = coordinator.listen("app", || {}).unwrap();

    factory.emit_error(NotifierError::new("event queue overflow"));
    factory.emit_error(NotifierError::new("permission denied").with_paths(vec!["app".into()]));
    factory.emit(FileChangeEvent::modified("app/main.go"));

    assert!(wait_until(Duration::from_secs(5), || {
        coordinator.invocations() == 1
    }));
    assert!(!handle.is_finished());

    coordinator.shutdown();
    handle.join().unwrap();
}

#[test]
fn unregistrable_directories_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("app");
    fs::create_dir_all(root.join("models")).unwrap();
    fs::create_dir_all(root.join("views")).unwrap();

    let factory = ScriptedNotifierFactory::new();
    factory.reject_path(root.join("models"));

    let coordinator =
        WatchCoordinator::new(Box::new(factory.clone()), Box::new(LocalFilesystem::new()));
    let pattern = format!("{}/*", root.display());
    let handle = coordinator.listen(&pattern, || {}).unwrap();

    assert_eq!(handle.directories().len(), 3);
    assert_eq!(handle.registered(), 2);
    assert_eq!(factory.watched_paths(), vec![root.clone(), root.join("views")]);

    coordinator.shutdown();
    handle.join().unwrap();
}

#[test]
fn scan_policy_controls_recursive_resolution() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("app");
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("c/d")).unwrap();
    fs::write(root.join("b.go"), "package app").unwrap();
    let pattern = format!("{}/*", root.display());

    let resolved = |policy| {
        let factory = ScriptedNotifierFactory::new();
        let coordinator =
            WatchCoordinator::new(Box::new(factory), Box::new(LocalFilesystem::new()))
                .with_scan_policy(policy);
        let handle = coordinator.listen(&pattern, || {}).unwrap();
        let dirs = handle.directories().to_vec();
        coordinator.shutdown();
        handle.join().unwrap();
        dirs
    };

    assert_eq!(
        resolved(ScanPolicy::Truncate),
        vec![root.clone(), root.join("a")]
    );
    assert_eq!(
        resolved(ScanPolicy::SkipFiles),
        vec![root.clone(), root.join("a"), root.join("c"), root.join("c/d")]
    );
}

#[test]
fn start_failure_is_returned_from_listen() {
    let factory = ScriptedNotifierFactory::new();
    factory.fail_start("inotify instance limit reached");
    let coordinator = scripted_coordinator(&factory);

    let err = coordinator.listen("app", || {}).unwrap_err();
    assert!(matches!(
        err,
        SunplateError::Application(ApplicationError::NotifierUnavailable { .. })
    ));
}

#[test]
fn shutdown_stops_every_loop() {
    let factory = ScriptedNotifierFactory::new();
    let coordinator = scripted_coordinator(&factory);
    let handles: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|p| coordinator.listen(p, || {}).unwrap())
        .collect();

    coordinator.shutdown();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(factory.stopped(), 3);

    // Nothing is listening any more.
    factory.emit(FileChangeEvent::modified("a/x.go"));
    thread::sleep(Duration::from_millis(20));
    assert_eq!(coordinator.invocations(), 0);
}

#[test]
fn shutdown_drops_pending_changes() {
    let factory = ScriptedNotifierFactory::new();
    let coordinator = scripted_coordinator(&factory);
    let (started_tx, started_rx) = crossbeam_channel::unbounded();
    let (release_tx, release_rx) = crossbeam_channel::unbounded::<()>();

    let handle = coordinator
        .listen("app", move || {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
        })
        .unwrap();

    for i in 0..10 {
        factory.emit(FileChangeEvent::modified(format!("app/{i}.go")));
    }
    // First run is in progress, nine more changes are queued behind it.
    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    coordinator.shutdown();
    drop(release_tx);

    handle.join().unwrap();
    assert_eq!(coordinator.invocations(), 1);
    assert_eq!(factory.stopped(), 1);
}

#[test]
fn closed_event_stream_ends_the_loop() {
    let factory = ScriptedNotifierFactory::new();
    let coordinator = scripted_coordinator(&factory);
    let handle = coordinator.listen("app", || {}).unwrap();

    factory.disconnect();
    assert!(wait_until(Duration::from_secs(5), || handle.is_finished()));
    handle.join().unwrap();
}

#[test]
fn dropping_the_coordinator_stops_loops() {
    let factory = ScriptedNotifierFactory::new();
    let handle = scripted_coordinator(&factory).listen("app", || {}).unwrap();

    handle.join().unwrap();
    assert_eq!(factory.stopped(), 1);
}

#[test]
fn native_notifier_reports_file_writes() {
    let tmp = tempfile::tempdir().unwrap();
    let dir: PathBuf = tmp.path().to_path_buf();

    let coordinator = WatchCoordinator::new(
        Box::new(NotifyWatcherFactory::new()),
        Box::new(LocalFilesystem::new()),
    );
    let handle = coordinator
        .listen(&dir.display().to_string(), || {})
        .unwrap();
    assert_eq!(handle.registered(), 1);

    // Give the backend a moment to arm before writing.
    thread::sleep(Duration::from_millis(100));
    fs::write(dir.join("main.go"), "package main\n").unwrap();
    fs::write(dir.join("main.go"), "package main\n\nfunc main() {}\n").unwrap();

    assert!(wait_until(Duration::from_secs(10), || {
        coordinator.invocations() >= 1
    }));

    coordinator.shutdown();
    handle.join().unwrap();
}
