//! Implementation of the `sunplate new` command.
//!
//! Responsibility: work out the workspace, skeleton and import paths from
//! flags and config, call the core scaffold service, and display results.
//! No business logic lives here.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, info, instrument};

use sunplate_adapters::LocalFilesystem;
use sunplate_core::{
    application::{ApplicationError, ScaffoldService},
    domain::{EntryKind, ModulePath, ResolvedModule, RewriteRule, ScaffoldPlan},
    error::SunplateError,
};

use crate::{
    cli::NewArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `sunplate new` command.
///
/// Dispatch sequence:
/// 1. Resolve workspace root and skeleton directory
/// 2. Determine the import path to replace and the new one
/// 3. Early-exit with a listing if `--dry-run`
/// 4. Execute scaffolding via `ScaffoldService`
/// 5. Print run instructions
#[instrument(skip_all, fields(target = %args.target))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let cwd = std::env::current_dir().map_err(|e| CliError::IoError {
        message: "Cannot determine the current directory".into(),
        source: e,
    })?;

    // 1. Workspace and skeleton
    let workspace_root = args
        .workspace
        .as_deref()
        .map(|p| absolutize(&cwd, p))
        .or_else(|| config.workspace_root().map(|p| absolutize(&cwd, &p)))
        .ok_or_else(|| CliError::ConfigError {
            message: "No workspace root: set GOPATH, scaffold.workspace_root or --workspace"
                .into(),
            source: None,
        })?;

    let template_dir = args
        .template
        .as_deref()
        .map(|p| absolutize(&cwd, p))
        .unwrap_or_else(|| config.template_dir(&workspace_root));

    if !template_dir.is_dir() {
        return Err(CliError::TemplateNotFound { path: template_dir });
    }

    // 2. Rewrite rule
    let old_import = skeleton_import(&args, &config, &template_dir, &workspace_root)?;
    let resolved = ModulePath::resolve(&args.target, &cwd, &workspace_root)
        .map_err(SunplateError::from)?;
    let rule =
        RewriteRule::new(old_import, resolved.module.as_str()).map_err(SunplateError::from)?;

    debug!(
        workspace = %workspace_root.display(),
        template = %template_dir.display(),
        rule = %rule,
        "Scaffold inputs resolved"
    );

    let service = ScaffoldService::new(Box::new(LocalFilesystem::new()))
        .with_source_extensions(config.source_extensions());

    // 3. Dry run: describe but do not write.
    if args.dry_run {
        if resolved.directory.exists() {
            return Err(SunplateError::from(ApplicationError::AlreadyExists {
                path: resolved.directory,
            })
            .into());
        }
        let plan = service.plan(&template_dir)?;
        return show_plan(&plan, &resolved, &rule, &output);
    }

    // 4. Scaffold
    output.header(&format!("Creating '{}'...", resolved.module))?;
    info!(destination = %resolved.directory.display(), "Scaffold started");

    let report = service.generate(&template_dir, &resolved.directory, &rule)?;

    // 5. Report
    if output.is_json() {
        output.json(&report)?;
        return Ok(());
    }

    output.success(&format!("Your application \"{}\" is ready:", report.module_path))?;
    output.print(&format!(
        "  {} directories, {} files copied, {} sources rewritten ({} replacements)",
        report.directories, report.static_files, report.source_files, report.replacements
    ))?;
    output.print("")?;
    output.print("You can run it with:")?;
    output.print(&format!("\tgo run {}", report.module_path))?;
    output.print("Rebuild on every change with:")?;
    output.print(&format!(
        "\tsunplate watch '{}/*' --exec 'go run {}'",
        report.destination.display(),
        report.module_path
    ))?;

    Ok(())
}

// ── Input resolution ──────────────────────────────────────────────────────────

/// Join relative paths onto `cwd`.
fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Import path used inside the skeleton: flag, then config, then the
/// skeleton's own location in the workspace.
fn skeleton_import(
    args: &NewArgs,
    config: &AppConfig,
    template_dir: &Path,
    workspace_root: &Path,
) -> CliResult<String> {
    if let Some(import) = args
        .from_import
        .clone()
        .or_else(|| config.scaffold.template_import.clone())
    {
        return Ok(import);
    }

    ModulePath::of_dir(template_dir, workspace_root)
        .map(|m| m.to_string())
        .map_err(|e| CliError::InvalidInput {
            message: format!(
                "cannot derive the skeleton's import path ({e}); pass --from-import"
            ),
            source: Some(Box::new(e)),
        })
}

// ── Dry run ───────────────────────────────────────────────────────────────────

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Directory => "directory",
        EntryKind::StaticFile => "copy",
        EntryKind::SourceFile => "rewrite",
    }
}

fn show_plan(
    plan: &ScaffoldPlan,
    resolved: &ResolvedModule,
    rule: &RewriteRule,
    output: &OutputManager,
) -> CliResult<()> {
    if output.is_json() {
        let entries: Vec<_> = plan
            .entries()
            .iter()
            .map(|e| {
                json!({
                    "kind": kind_label(e.kind),
                    "path": e.relative_path,
                })
            })
            .collect();
        output.json(&json!({
            "dry_run": true,
            "module_path": resolved.module,
            "destination": resolved.directory,
            "rewrite": { "from": rule.old_token(), "to": rule.new_token() },
            "entries": entries,
        }))?;
        return Ok(());
    }

    output.info(&format!(
        "Dry run: would create '{}' at {}",
        resolved.module,
        resolved.directory.display()
    ))?;
    output.info(&format!("  Rewrite: {rule}"))?;
    for entry in plan.entries().iter().filter(|e| !e.is_root()) {
        output.print(&format!(
            "  {:<9} {}",
            kind_label(entry.kind),
            entry.relative_path.display()
        ))?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
