//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SUNPLATE__<SECTION>__<KEY>`, e.g.
//!    `SUNPLATE__WATCH__SCAN_POLICY=truncate`
//! 3. Config file: `--config FILE`, or else `.sunplate.toml` in the current
//!    directory over the user config file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use sunplate_core::domain::{DEFAULT_SOURCE_EXTENSION, ScanPolicy, SourceExtensions};

use crate::cli::OutputFormat;

/// Name of the per-project config file.
pub const LOCAL_CONFIG_FILE: &str = ".sunplate.toml";

/// Import path of the toolkit itself; the skeleton lives below it.
pub const TOOLKIT_IMPORT: &str = "github.com/anonx/sunplate";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings for `sunplate new`.
    pub scaffold: ScaffoldConfig,
    /// Settings for `sunplate watch`.
    pub watch: WatchConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Skeleton directory. Defaults to `<workspace>/github.com/anonx/sunplate/skeleton`.
    pub template_dir: Option<PathBuf>,
    /// Import path written inside the skeleton. Derived from `template_dir`
    /// when unset.
    pub template_import: Option<String>,
    /// Root that import paths are relative to. Defaults to `$GOPATH/src`.
    pub workspace_root: Option<PathBuf>,
    /// File extensions whose content is rewritten.
    pub source_extensions: Vec<String>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            template_import: None,
            workspace_root: None,
            source_extensions: vec![DEFAULT_SOURCE_EXTENSION.to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub scan_policy: ScanPolicy,
    /// Shell used to run `--exec`. `sh` (or `cmd` on Windows) when unset.
    pub shell: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: OutputFormat,
}

impl AppConfig {
    /// Load configuration from files and the environment over defaults.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None => builder
                .add_source(File::from(Self::config_path()).required(false))
                .add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("SUNPLATE")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("scaffold.source_extensions")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.sunplate.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "anonx", "sunplate")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Workspace root: configured value, else the first `$GOPATH` entry's
    /// `src`, else `~/go/src`.
    pub fn workspace_root(&self) -> Option<PathBuf> {
        if let Some(root) = &self.scaffold.workspace_root {
            return Some(root.clone());
        }
        if let Some(gopath) = std::env::var_os("GOPATH") {
            if let Some(first) = std::env::split_paths(&gopath).find(|p| !p.as_os_str().is_empty())
            {
                return Some(first.join("src"));
            }
        }
        directories::BaseDirs::new().map(|d| d.home_dir().join("go").join("src"))
    }

    /// Skeleton directory for a given workspace root.
    pub fn template_dir(&self, workspace_root: &Path) -> PathBuf {
        self.scaffold.template_dir.clone().unwrap_or_else(|| {
            workspace_root
                .join(TOOLKIT_IMPORT.replace('/', std::path::MAIN_SEPARATOR_STR))
                .join("skeleton")
        })
    }

    pub fn source_extensions(&self) -> SourceExtensions {
        SourceExtensions::new(&self.scaffold.source_extensions)
    }
}
