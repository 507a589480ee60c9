//! `sunplate init`: write a settings file filled with the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::debug;

use crate::{
    cli::InitArgs,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliError, CliResult},
    output::OutputManager,
};

const HEADER: &str = "\
# Sunplate settings.
# Any key can be overridden from the environment as SUNPLATE__<SECTION>__<KEY>,
# e.g. SUNPLATE__WATCH__SCAN_POLICY=truncate.
";

pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let path = if args.local {
        PathBuf::from(LOCAL_CONFIG_FILE)
    } else {
        AppConfig::config_path()
    };

    if path.exists() && !args.force {
        output.warning(&format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    write_defaults(&path)?;
    debug!(path = %path.display(), "Default settings written");

    if output.is_json() {
        output.json(&json!({ "path": path }))?;
    } else {
        output.success(&format!("Configuration created at {}", path.display()))?;
    }
    Ok(())
}

fn write_defaults(path: &Path) -> CliResult<()> {
    let body = toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise default config: {e}"),
        source: Some(Box::new(e)),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CliError::IoError {
            message: format!("Failed to create '{}'", parent.display()),
            source,
        })?;
    }

    fs::write(path, format!("{HEADER}\n{body}")).map_err(|source| CliError::IoError {
        message: format!("Failed to write '{}'", path.display()),
        source,
    })
}
