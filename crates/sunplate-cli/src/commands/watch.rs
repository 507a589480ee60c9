//! Implementation of the `sunplate watch` command.
//!
//! Every pattern gets its own monitoring loop on one shared coordinator, so
//! runs of the command never overlap. Ctrl-C shuts the coordinator down and
//! the command returns once every loop has stopped.

use std::process::{Command, ExitStatus};
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use sunplate_adapters::{LocalFilesystem, NotifyWatcherFactory};
use sunplate_core::{
    application::{WatchCoordinator, WatchHandle},
    domain::ScanPolicy,
};

use crate::{
    cli::WatchArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `sunplate watch` command. Blocks until interrupted.
#[instrument(skip_all, fields(patterns = ?args.patterns))]
pub fn execute(args: WatchArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let policy = args
        .scan_policy
        .map(ScanPolicy::from)
        .unwrap_or(config.watch.scan_policy);
    let runner = CommandRunner::new(config.watch.shell.as_deref(), &args.exec);

    let coordinator = Arc::new(
        WatchCoordinator::new(
            Box::new(NotifyWatcherFactory::new()),
            Box::new(LocalFilesystem::new()),
        )
        .with_scan_policy(policy),
    );
    debug!(%policy, shell = %runner.shell, "Starting watch loops");

    let on_interrupt = Arc::clone(&coordinator);
    ctrlc::set_handler(move || on_interrupt.shutdown())
        .map_err(|source| CliError::SignalHandler { source })?;

    supervise(&coordinator, &args, &runner, &output)
}

/// Listen on every pattern, then wait for all loops to stop.
fn supervise(
    coordinator: &WatchCoordinator,
    args: &WatchArgs,
    runner: &CommandRunner,
    output: &OutputManager,
) -> CliResult<()> {
    let mut handles = Vec::with_capacity(args.patterns.len());
    for pattern in &args.patterns {
        let runner = runner.clone();
        let handle = coordinator.listen(pattern, move || {
            runner.run();
        })?;

        announce(&handle, output)?;
        handles.push(handle);
    }

    output.print(&format!(
        "Running `{}` after every change. Press Ctrl-C to stop.",
        args.exec
    ))?;

    for handle in handles {
        handle.join()?;
    }

    let runs = coordinator.invocations();
    if output.is_json() {
        output.json(&json!({ "patterns": args.patterns, "runs": runs }))?;
    } else {
        output.success(&format!("Stopped after {runs} run(s)"))?;
    }
    Ok(())
}

fn announce(handle: &WatchHandle, output: &OutputManager) -> CliResult<()> {
    if handle.registered() == 0 {
        output.warning(&format!("Nothing to watch for '{}'", handle.pattern()))?;
    } else {
        output.info(&format!(
            "Watching {} of {} director{} for '{}'",
            handle.registered(),
            handle.directories().len(),
            if handle.directories().len() == 1 { "y" } else { "ies" },
            handle.pattern()
        ))?;
    }
    Ok(())
}

/// Runs the user's command through a shell.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    shell: String,
    flag: &'static str,
    command: String,
}

impl CommandRunner {
    /// `shell` defaults to `sh` (`cmd` on Windows).
    pub fn new(shell: Option<&str>, command: &str) -> Self {
        let shell = shell.map(str::to_string).unwrap_or_else(default_shell);
        let flag = command_flag(&shell);
        Self {
            shell,
            flag,
            command: command.to_string(),
        }
    }

    /// Run the command to completion. Failures are logged, never returned:
    /// the next change gets another attempt.
    pub fn run(&self) -> Option<ExitStatus> {
        info!(command = %self.command, "Change detected, running command");

        match Command::new(&self.shell)
            .arg(self.flag)
            .arg(&self.command)
            .status()
        {
            Ok(status) if status.success() => {
                debug!(command = %self.command, "Command finished");
                Some(status)
            }
            Ok(status) => {
                warn!(command = %self.command, code = ?status.code(), "Command failed");
                Some(status)
            }
            Err(e) => {
                error!(shell = %self.shell, error = %e, "Cannot start command");
                None
            }
        }
    }
}

fn default_shell() -> String {
    if cfg!(windows) { "cmd" } else { "sh" }.to_string()
}

fn command_flag(shell: &str) -> &'static str {
    let name = std::path::Path::new(shell)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(shell)
        .to_ascii_lowercase();
    match name.as_str() {
        "cmd" => "/C",
        "powershell" | "pwsh" => "-Command",
        _ => "-c",
    }
}
