//! Scaffold Service - creates a new application from the skeleton.
//!
//! This service coordinates the whole workflow:
//! 1. Refuse to touch an existing destination
//! 2. Walk and classify the skeleton into a `ScaffoldPlan`
//! 3. Create directories, copy static files, rewrite source files
//!
//! There is no rollback. If a write fails halfway, whatever was created
//! before the failure stays on disk.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        DomainValidator as validator, RewriteRule, ScaffoldEntry, ScaffoldPlan, SourceExtensions,
    },
    error::{SunplateError, SunplateResult},
};

/// Summary of a finished scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub destination: PathBuf,
    /// Import path of the new application.
    pub module_path: String,
    pub directories: usize,
    pub static_files: usize,
    pub source_files: usize,
    /// Total number of token occurrences rewritten.
    pub replacements: usize,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    source_extensions: SourceExtensions,
}

impl ScaffoldService {
    /// Create a new scaffold service on top of the given filesystem.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use sunplate_core::application::ScaffoldService;
    ///
    /// let service = ScaffoldService::new(Box::new(LocalFilesystem::new()));
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            source_extensions: SourceExtensions::default(),
        }
    }

    /// Override which extensions are treated as source files.
    pub fn with_source_extensions(mut self, extensions: SourceExtensions) -> Self {
        self.source_extensions = extensions;
        self
    }

    /// Walk `template_root` once and classify every entry.
    #[instrument(skip_all, fields(template = %template_root.as_ref().display()))]
    pub fn plan(&self, template_root: impl AsRef<Path>) -> SunplateResult<ScaffoldPlan> {
        let template_root = template_root.as_ref();
        let mut plan = ScaffoldPlan::new(template_root);

        for entry in self.filesystem.walk(template_root) {
            let entry = entry?;
            let entry = ScaffoldEntry::classify(
                entry.path,
                entry.relative,
                entry.is_dir,
                &self.source_extensions,
            );
            trace!(path = %entry.relative_path.display(), kind = ?entry.kind, "Classified");
            plan.push(entry).map_err(SunplateError::Domain)?;
        }

        debug!(
            directories = plan.directories().count(),
            static_files = plan.static_files().count(),
            source_files = plan.source_files().count(),
            "Skeleton scanned"
        );
        Ok(plan)
    }

    /// Create a new application at `destination_root` from `template_root`.
    ///
    /// Fails with `AlreadyExists` before any write if the destination is
    /// present.
    #[instrument(
        skip_all,
        fields(
            template = %template_root.as_ref().display(),
            destination = %destination_root.as_ref().display(),
        )
    )]
    pub fn generate(
        &self,
        template_root: impl AsRef<Path>,
        destination_root: impl AsRef<Path>,
        rule: &RewriteRule,
    ) -> SunplateResult<ScaffoldReport> {
        let template_root = template_root.as_ref();
        let destination_root = destination_root.as_ref();

        // 1. Destination must not exist yet
        if self.filesystem.exists(destination_root) {
            return Err(ApplicationError::AlreadyExists {
                path: destination_root.to_path_buf(),
            }
            .into());
        }

        // 2. Scan skeleton
        let plan = self.plan(template_root)?;
        validator::validate_plan(&plan).map_err(SunplateError::Domain)?;

        // 3. Materialize
        let replacements = self.materialize(&plan, destination_root, rule)?;

        let report = ScaffoldReport {
            destination: destination_root.to_path_buf(),
            module_path: rule.new_token().to_string(),
            directories: plan.directories().count(),
            static_files: plan.static_files().count(),
            source_files: plan.source_files().count(),
            replacements,
        };

        info!(
            module = %report.module_path,
            destination = %report.destination.display(),
            "Application \"{}\" is ready",
            report.module_path
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Directories first (in traversal order), then static files, then
    /// rewritten sources. Returns the number of replacements made.
    fn materialize(
        &self,
        plan: &ScaffoldPlan,
        destination_root: &Path,
        rule: &RewriteRule,
    ) -> SunplateResult<usize> {
        for dir in plan.directories() {
            self.filesystem
                .create_dir_all(&dir.destination_in(destination_root))?;
        }

        for file in plan.static_files() {
            let target = file.destination_in(destination_root);
            trace!(from = %file.source_path.display(), to = %target.display(), "Copying");
            self.filesystem.copy_file(&file.source_path, &target)?;
        }

        let mut replacements = 0;
        for source in plan.source_files() {
            let target = source.destination_in(destination_root);
            let content = self.filesystem.read(&source.source_path)?;

            let count = rule.occurrences(&content);
            trace!(path = %source.relative_path.display(), count, "Rewriting imports");
            self.filesystem.write_file(&target, &rule.apply(&content))?;
            replacements += count;
        }

        Ok(replacements)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::application::ports::{MockFilesystem, TreeEntry};

    fn tree(entries: &[(&str, bool)]) -> Vec<SunplateResult<TreeEntry>> {
        entries
            .iter()
            .map(|(relative, is_dir)| {
                Ok(TreeEntry {
                    path: Path::new("/skeleton").join(relative),
                    relative: PathBuf::from(relative),
                    is_dir: *is_dir,
                })
            })
            .collect()
    }

    fn rule() -> RewriteRule {
        RewriteRule::new("github.com/anonx/sunplate/example", "github.com/acme/widget").unwrap()
    }

    #[test]
    fn existing_destination_aborts_before_any_work() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().times(1).return_const(true);
        // No other expectations: any walk or write would panic the mock.

        let service = ScaffoldService::new(Box::new(fs));
        let err = service.generate("/skeleton", "/out", &rule()).unwrap_err();

        assert!(err.is_already_exists());
    }

    #[test]
    fn plan_classifies_in_walk_order() {
        let mut fs = MockFilesystem::new();
        let entries = tree(&[
            ("", true),
            ("README.md", false),
            ("assets", true),
            ("controllers", true),
            ("controllers/init.go", false),
        ]);
        fs.expect_walk()
            .return_once(move |_| Box::new(entries.into_iter()));

        let plan = ScaffoldService::new(Box::new(fs)).plan("/skeleton").unwrap();

        assert_eq!(plan.len(), 5);
        assert_eq!(plan.directories().count(), 3);
        assert_eq!(
            plan.source_files().next().unwrap().relative_path,
            PathBuf::from("controllers/init.go")
        );
    }

    #[test]
    fn walk_error_is_propagated() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_walk().return_once(|root| {
            let err: SunplateResult<TreeEntry> = Err(ApplicationError::FilesystemError {
                path: root.to_path_buf(),
                reason: "No such file or directory".into(),
            }
            .into());
            Box::new(std::iter::once(err))
        });

        let err = ScaffoldService::new(Box::new(fs))
            .generate("/missing", "/out", &rule())
            .unwrap_err();

        assert!(matches!(
            err,
            SunplateError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn directories_are_created_before_files_are_written() {
        let mut fs = MockFilesystem::new();
        let mut seq = mockall::Sequence::new();
        let entries = tree(&[("", true), ("controllers", true), ("controllers/init.go", false)]);

        fs.expect_exists().return_const(false);
        fs.expect_walk()
            .return_once(move |_| Box::new(entries.into_iter()));
        fs.expect_create_dir_all()
            .withf(|p| p == Path::new("/out"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_create_dir_all()
            .withf(|p| p == Path::new("/out/controllers"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_read()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(b"import \"github.com/anonx/sunplate/example/app\"".to_vec()));
        fs.expect_write_file()
            .withf(|p, content| {
                p == Path::new("/out/controllers/init.go")
                    && content == b"import \"github.com/acme/widget/app\""
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let report = ScaffoldService::new(Box::new(fs))
            .generate("/skeleton", "/out", &rule())
            .unwrap();

        assert_eq!(report.module_path, "github.com/acme/widget");
        assert_eq!(report.directories, 2);
        assert_eq!(report.source_files, 1);
        assert_eq!(report.replacements, 1);
    }

    #[test]
    fn custom_extensions_change_classification() {
        let mut fs = MockFilesystem::new();
        let entries = tree(&[("", true), ("views", true), ("views/index.html", false)]);
        fs.expect_walk()
            .return_once(move |_| Box::new(entries.into_iter()));

        let plan = ScaffoldService::new(Box::new(fs))
            .with_source_extensions(SourceExtensions::new(["go", "html"]))
            .plan("/skeleton")
            .unwrap();

        assert_eq!(plan.source_files().count(), 1);
        assert_eq!(plan.static_files().count(), 0);
    }
}
