//! Integration tests for the sunplate binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SKELETON_IMPORT: &str = "github.com/anonx/sunplate/skeleton";

/// A fake home with `GOPATH=<home>/go` and the skeleton in place.
struct Sandbox {
    _home: TempDir,
    root: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        // Canonical so it matches what the binary sees as its cwd.
        let root = fs::canonicalize(home.path()).unwrap();
        let sandbox = Self { _home: home, root };
        let skeleton = sandbox.skeleton();
        fs::create_dir_all(skeleton.join("assets")).unwrap();
        fs::create_dir_all(skeleton.join("controllers")).unwrap();
        fs::write(skeleton.join("README.md"), "hello").unwrap();
        fs::write(
            skeleton.join("controllers/init.go"),
            format!("package controllers\n\nimport \"{SKELETON_IMPORT}/routes\"\n"),
        )
        .unwrap();
        sandbox
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn workspace(&self) -> PathBuf {
        self.root().join("go").join("src")
    }

    fn skeleton(&self) -> PathBuf {
        self.workspace().join(SKELETON_IMPORT)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sunplate").unwrap();
        cmd.current_dir(self.root())
            .env("HOME", self.root())
            .env("XDG_CONFIG_HOME", self.root().join(".config"))
            .env("GOPATH", self.root().join("go"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn widget_dir(sandbox: &Sandbox) -> PathBuf {
    sandbox.workspace().join("github.com/acme/widget")
}

#[test]
fn test_help_flag() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sunplate"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("new"));
}

#[test]
fn test_version_flag() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_new_command_help() {
    Sandbox::new()
        .cmd()
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--template"))
        .stdout(predicate::str::contains("--from-import"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_new_from_import_path() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["new", "github.com/acme/widget"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Your application \"github.com/acme/widget\" is ready",
        ));

    let dest = widget_dir(&sandbox);
    assert!(dest.join("assets").is_dir());
    assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "hello");
    let init = fs::read_to_string(dest.join("controllers/init.go")).unwrap();
    assert!(init.contains("\"github.com/acme/widget/routes\""));
    assert!(!init.contains(SKELETON_IMPORT));
}

#[test]
fn test_new_from_relative_path() {
    let sandbox = Sandbox::new();
    let parent = sandbox.workspace().join("github.com/acme");
    fs::create_dir_all(&parent).unwrap();

    sandbox
        .cmd()
        .current_dir(&parent)
        .args(["new", "./widget"])
        .assert()
        .success();

    let init = fs::read_to_string(widget_dir(&sandbox).join("controllers/init.go")).unwrap();
    assert!(init.contains("github.com/acme/widget/routes"));
}

#[test]
fn test_new_with_explicit_template_and_workspace() {
    let sandbox = Sandbox::new();
    let other = TempDir::new().unwrap();
    let template = other.path().join("tmpl");
    fs::create_dir_all(&template).unwrap();
    fs::write(template.join("main.go"), "import \"example.com/base/lib\"").unwrap();
    let workspace = other.path().join("ws");

    sandbox
        .cmd()
        .args(["new", "example.com/shop", "--from-import", "example.com/base"])
        .arg("--template")
        .arg(&template)
        .arg("--workspace")
        .arg(&workspace)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(workspace.join("example.com/shop/main.go")).unwrap(),
        "import \"example.com/shop/lib\""
    );
}

#[test]
fn test_new_dry_run_writes_nothing() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["new", "github.com/acme/widget", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("rewrite"))
        .stdout(predicate::str::contains("init.go"));

    assert!(!widget_dir(&sandbox).exists());
}

#[test]
fn test_new_json_report() {
    let sandbox = Sandbox::new();

    let assert = sandbox
        .cmd()
        .args(["--output-format", "json", "new", "github.com/acme/widget"])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["module_path"], "github.com/acme/widget");
    assert_eq!(report["source_files"], 1);
    assert_eq!(report["static_files"], 1);
    assert_eq!(report["replacements"], 1);
}

#[test]
fn test_completions_bash() {
    Sandbox::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sunplate"));
}

#[test]
fn test_config_get_reads_environment() {
    Sandbox::new()
        .cmd()
        .env("SUNPLATE__WATCH__SCAN_POLICY", "truncate")
        .args(["config", "get", "watch.scan_policy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("truncate"));
}

#[test]
fn test_config_get_reads_local_file() {
    let sandbox = Sandbox::new();
    fs::write(
        sandbox.root().join(".sunplate.toml"),
        "[watch]\nshell = \"bash\"\n",
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["config", "get", "watch.shell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bash"));
}

#[test]
fn test_init_local_then_refuse_overwrite() {
    let sandbox = Sandbox::new();
    let path = sandbox.root().join(".sunplate.toml");

    sandbox
        .cmd()
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("scan_policy"));

    sandbox
        .cmd()
        .args(["init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_config_path_honours_flag() {
    let sandbox = Sandbox::new();
    let file = sandbox.root().join("custom.toml");
    fs::write(&file, "").unwrap();

    sandbox
        .cmd()
        .arg("--config")
        .arg(&file)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_no_color_env_accepts_any_value() {
    for value in ["1", "yes", "0", ""] {
        Sandbox::new()
            .cmd()
            .env("NO_COLOR", value)
            .args(["config", "get", "output.no_color"])
            .assert()
            .success();
    }
}

#[test]
fn test_no_color_env_with_new() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .env("NO_COLOR", "1")
        .args(["new", "github.com/acme/widget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is ready"))
        .stdout(predicate::str::contains("\u{1b}[").not());
}
