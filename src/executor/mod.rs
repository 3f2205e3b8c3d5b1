//! Applies a [`Plan`] to the target directory.
//!
//! Operations run sequentially in plan order. A failing operation is
//! recorded and the remaining, independent operations still run. Directory
//! operations are expanded file by file and the overwrite policy applies to
//! each file on its own.
pub mod fs;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::OverwritePolicy;
use crate::error::{ExecutionError, TemplateError};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::plan::{OperationKind, Plan, PlannedOperation, is_template, output_name};
use crate::template::{TemplateContext, render_structured, render_text};

/// Suffix of templates rendered through the structured (JSON) renderer.
const STRUCTURED_SUFFIX: &str = ".tpl.json";

/// Aggregate outcome of applying a plan.
#[derive(Debug, Default)]
pub struct ExecutionResult {
    /// Files written (created, overwritten or written after a backup).
    pub written: usize,
    /// Files left alone because they already existed under `skip`.
    pub skipped: usize,
    /// Failures in plan order.
    pub errors: Vec<ExecutionError>,
}

impl ExecutionResult {
    /// Returns `true` if no operation failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// The summary line printed after applying a plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use cc_sdd_cli::executor::ExecutionResult;
    ///
    /// let result = ExecutionResult { written: 3, skipped: 1, errors: vec![] };
    /// assert_eq!(result.summary(), "Setup completed: written=3, skipped=1");
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Setup completed: written={}, skipped={}",
            self.written, self.skipped
        )
    }
}

/// What happened to a single destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Written,
    Skipped,
}

/// Applies plans against a templates root and a target directory.
pub struct Executor<'a> {
    templates_root: PathBuf,
    target_root: PathBuf,
    backup_dir: String,
    fs_ops: Arc<dyn FileSystemOps>,
    log: &'a dyn Log,
}

impl std::fmt::Debug for Executor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("templates_root", &self.templates_root)
            .field("target_root", &self.target_root)
            .field("backup_dir", &self.backup_dir)
            .finish_non_exhaustive()
    }
}

impl<'a> Executor<'a> {
    /// Create an executor using the real filesystem.
    ///
    /// `backup_dir` is relative to `target_root`.
    #[must_use]
    pub fn new(
        templates_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        backup_dir: impl Into<String>,
        log: &'a dyn Log,
    ) -> Self {
        Self {
            templates_root: templates_root.into(),
            target_root: target_root.into(),
            backup_dir: backup_dir.into(),
            fs_ops: Arc::new(SystemFileSystemOps),
            log,
        }
    }

    /// Replace the filesystem implementation (used by tests).
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }

    /// Dry-run report for `plan`. Touches nothing on disk.
    #[must_use]
    pub fn describe(plan: &Plan<'_>) -> Vec<String> {
        plan.describe()
    }

    /// Apply every operation of `plan` under `policy`.
    #[must_use]
    pub fn apply(&self, plan: &Plan<'_>, policy: OverwritePolicy) -> ExecutionResult {
        let mut result = ExecutionResult::default();
        for op in &plan.operations {
            self.log.debug(&format!("applying {op}"));
            match op.kind {
                OperationKind::CopyFile => {
                    let source = fs::join_relative(&self.templates_root, &op.source);
                    let dest = fs::join_relative(&self.target_root, &op.dest);
                    self.record(
                        self.install(op, &source, &dest, op.rendered, plan.context, policy),
                        &mut result,
                    );
                }
                OperationKind::CopyDir => {
                    self.apply_dir(op, plan.context, policy, &mut result);
                }
            }
        }
        result
    }

    fn apply_dir(
        &self,
        op: &PlannedOperation<'_>,
        ctx: &TemplateContext,
        policy: OverwritePolicy,
        result: &mut ExecutionResult,
    ) {
        let source_root = fs::join_relative(&self.templates_root, &op.source);
        let dest_root = fs::join_relative(&self.target_root, &op.dest);

        let mut files = Vec::new();
        if let Err(source) = self.collect_files(&source_root, &mut files) {
            self.record(
                Err(ExecutionError::Io {
                    artifact: op.artifact_id().to_string(),
                    action: "read",
                    path: source_root,
                    source,
                }),
                result,
            );
            return;
        }

        // `x.md` and `x.tpl.md` land on the same file; the first in sorted
        // order wins.
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        for file in files {
            let Ok(relative) = file.strip_prefix(&source_root) else {
                continue;
            };
            let name = relative
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let rendered = op.rendered && is_template(&name);
            let out_name = if rendered { output_name(&name) } else { name };
            let dest = dest_root.join(relative).with_file_name(out_name);
            if let Some(first) = claimed.get(&dest) {
                self.record(
                    Err(ExecutionError::DuplicateDestination {
                        artifact: op.artifact_id().to_string(),
                        first: fs::relative_to(first, &self.templates_root),
                        path: fs::relative_to(&file, &self.templates_root),
                        dest: fs::relative_to(&dest, &self.target_root),
                    }),
                    result,
                );
                continue;
            }
            self.record(self.install(op, &file, &dest, rendered, ctx, policy), result);
            claimed.insert(dest, file);
        }
    }

    /// Every regular file under `dir`, depth first in sorted name order.
    fn collect_files(&self, dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
        if !self.fs_ops.is_dir(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "template directory not found",
            ));
        }
        for entry in self.fs_ops.read_dir(dir)? {
            if self.fs_ops.is_dir(&entry) {
                self.collect_files(&entry, files)?;
            } else {
                files.push(entry);
            }
        }
        Ok(())
    }

    fn record(&self, outcome: Result<FileOutcome, ExecutionError>, result: &mut ExecutionResult) {
        match outcome {
            Ok(FileOutcome::Written) => result.written += 1,
            Ok(FileOutcome::Skipped) => result.skipped += 1,
            Err(e) => {
                self.log.error(&e.to_string());
                result.errors.push(e);
            }
        }
    }

    /// Produce the content for one file and write it under `policy`.
    fn install(
        &self,
        op: &PlannedOperation<'_>,
        source: &Path,
        dest: &Path,
        render: bool,
        ctx: &TemplateContext,
        policy: OverwritePolicy,
    ) -> Result<FileOutcome, ExecutionError> {
        let artifact = op.artifact_id();
        let io_error = |action: &'static str, path: &Path| {
            let path = path.to_path_buf();
            move |source: io::Error| ExecutionError::Io {
                artifact: artifact.to_string(),
                action,
                path,
                source,
            }
        };

        let raw = self.fs_ops.read(source).map_err(io_error("read", source))?;
        let contents = if render {
            Self::render(&raw, source, ctx).map_err(|e| match e {
                RenderFailure::Decode(err) => io_error("read", source)(err),
                RenderFailure::Template(err) => ExecutionError::Template {
                    artifact: artifact.to_string(),
                    path: source.to_path_buf(),
                    source: err,
                },
            })?
        } else {
            raw
        };

        let shown = fs::relative_to(dest, &self.target_root);
        if self.fs_ops.exists(dest) {
            match policy {
                OverwritePolicy::Skip => {
                    self.log
                        .info(&format!("skip {} (already exists)", shown.display()));
                    return Ok(FileOutcome::Skipped);
                }
                OverwritePolicy::Force => {
                    self.log.debug(&format!("overwrite {}", shown.display()));
                }
                OverwritePolicy::Backup => {
                    let backup = self.target_root.join(&self.backup_dir).join(&shown);
                    self.fs_ops
                        .rename(dest, &backup)
                        .map_err(io_error("back up", dest))?;
                    self.log.info(&format!(
                        "backed up {} to {}",
                        shown.display(),
                        fs::relative_to(&backup, &self.target_root).display()
                    ));
                }
            }
        }

        self.fs_ops
            .write(dest, &contents)
            .map_err(io_error("write", dest))?;
        self.log.debug(&format!("wrote {}", shown.display()));
        Ok(FileOutcome::Written)
    }

    fn render(raw: &[u8], source: &Path, ctx: &TemplateContext) -> Result<Vec<u8>, RenderFailure> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| RenderFailure::Decode(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let structured = source
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with(STRUCTURED_SUFFIX));
        if structured {
            let value = render_structured(text, ctx).map_err(RenderFailure::Template)?;
            let mut pretty = serde_json::to_string_pretty(&value)
                .map_err(|e| RenderFailure::Template(e.into()))?;
            pretty.push('\n');
            Ok(pretty.into_bytes())
        } else {
            Ok(render_text(text, ctx).into_bytes())
        }
    }
}

enum RenderFailure {
    Decode(io::Error),
    Template(TemplateError),
}
