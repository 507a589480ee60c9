//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use sunplate_core::domain::ScanPolicy;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "sunplate",
    bin_name = "sunplate",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Skeleton generator and rebuild watcher for Sunplate applications",
    long_about = "Sunplate creates new applications from the toolkit skeleton, \
                  rewriting its import path, and re-runs a command whenever \
                  watched sources are written.",
    after_help = "EXAMPLES:\n\
        \x20 sunplate new github.com/acme/widget\n\
        \x20 sunplate new ./widget --template ~/skeleton --from-import example.com/skeleton\n\
        \x20 sunplate watch 'app/*' --exec 'go build ./...'\n\
        \x20 sunplate completions bash > /usr/share/bash-completion/completions/sunplate",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new application from the skeleton.
    #[command(
        visible_alias = "n",
        about = "Create a skeleton application",
        long_about = "Copies the skeleton into a directory that does not exist yet and \
                      rewrites the skeleton's import path in every source file.\n\n\
                      The target is either a path starting with '.' (or an absolute \
                      path) inside the workspace, or an import path placed under the \
                      workspace root.",
        after_help = "EXAMPLES:\n\
            \x20 sunplate new github.com/acme/widget\n\
            \x20 sunplate new ./widget\n\
            \x20 sunplate new ../acme/widget --dry-run"
    )]
    New(NewArgs),

    /// Run a command whenever watched directories are written to.
    #[command(
        visible_alias = "w",
        about = "Re-run a command on changes",
        long_about = "Watches the given directories and runs COMMAND through the shell \
                      after every write. A trailing '*' on a pattern also watches every \
                      directory below it. Runs never overlap. Stop with Ctrl-C.",
        after_help = "EXAMPLES:\n\
            \x20 sunplate watch 'app/*' --exec 'go build ./...'\n\
            \x20 sunplate watch controllers views --exec 'make' --scan-policy truncate"
    )]
    Watch(WatchArgs),

    /// Initialise a Sunplate configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 sunplate init           # user config directory\n\
            \x20 sunplate init --local   # .sunplate.toml in CWD\n\
            \x20 sunplate init --force   # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 sunplate completions bash > ~/.local/share/bash-completion/completions/sunplate\n\
            \x20 sunplate completions zsh  > ~/.zfunc/_sunplate\n\
            \x20 sunplate completions fish > ~/.config/fish/completions/sunplate.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Sunplate configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 sunplate config get watch.scan_policy\n\
            \x20 sunplate config list\n\
            \x20 sunplate config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `sunplate new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Import path (`github.com/acme/widget`) or directory (`./widget`).
    #[arg(value_name = "PATH|IMPORT", help = "Import path or directory of the new application")]
    pub target: String,

    /// Skeleton directory to copy.
    #[arg(
        short = 't',
        long = "template",
        value_name = "DIR",
        help = "Skeleton directory (default: <workspace>/github.com/anonx/sunplate/skeleton)"
    )]
    pub template: Option<PathBuf>,

    /// Import path used inside the skeleton, replaced in source files.
    #[arg(
        long = "from-import",
        value_name = "IMPORT",
        help = "Import path to replace (default: derived from the skeleton location)"
    )]
    pub from_import: Option<String>,

    /// Workspace root that import paths are relative to.
    #[arg(
        short = 'w',
        long = "workspace",
        value_name = "DIR",
        help = "Workspace root (default: $GOPATH/src)"
    )]
    pub workspace: Option<PathBuf>,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── watch ─────────────────────────────────────────────────────────────────────

/// Arguments for `sunplate watch`.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Directories to watch; a trailing `*` includes every subdirectory.
    #[arg(value_name = "PATTERN", required = true, num_args = 1..)]
    pub patterns: Vec<String>,

    /// Command to run after each write.
    #[arg(
        short = 'e',
        long = "exec",
        value_name = "COMMAND",
        help = "Shell command to run on every change"
    )]
    pub exec: String,

    /// How recursive patterns treat plain files.
    #[arg(
        long = "scan-policy",
        value_enum,
        value_name = "POLICY",
        help = "What a recursive scan does when it meets a file"
    )]
    pub scan_policy: Option<ScanPolicyArg>,
}

/// CLI mirror of [`ScanPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanPolicyArg {
    /// Stop the scan at the first file (legacy behaviour).
    Truncate,
    /// Skip files and keep scanning.
    SkipFiles,
}

impl From<ScanPolicyArg> for ScanPolicy {
    fn from(arg: ScanPolicyArg) -> Self {
        match arg {
            ScanPolicyArg::Truncate => ScanPolicy::Truncate,
            ScanPolicyArg::SkipFiles => ScanPolicy::SkipFiles,
        }
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `sunplate init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.sunplate.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `sunplate completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: clap_complete::Shell,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `sunplate config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `watch.scan_policy`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
