//! Expansion of a manifest into an ordered list of file operations.
//!
//! Planning is pure: paths are substituted through the renderer but nothing
//! is read from or written to disk. The same plan drives both the dry-run
//! report and the executor.
use std::fmt;

use crate::manifest::{Artifact, Manifest, TemplateSource};
use crate::platform::Os;
use crate::template::{TemplateContext, render_text};

/// Marker that identifies a template file by name.
pub const TEMPLATE_MARKER: &str = ".tpl";

/// The kind of a planned operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Install one file.
    CopyFile,
    /// Mirror a whole source directory.
    CopyDir,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CopyFile => write!(f, "templateFile"),
            Self::CopyDir => write!(f, "templateDir"),
        }
    }
}

/// One operation produced from an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOperation<'a> {
    /// Artifact this operation was expanded from.
    pub artifact: &'a Artifact,
    /// Single file or whole directory.
    pub kind: OperationKind,
    /// Source path relative to the templates root.
    pub source: String,
    /// Destination relative to the target directory: the output file for
    /// [`OperationKind::CopyFile`], the output directory for
    /// [`OperationKind::CopyDir`].
    pub dest: String,
    /// Whether template files are rendered rather than copied verbatim.
    pub rendered: bool,
}

impl PlannedOperation<'_> {
    /// Identifier of the originating artifact.
    #[must_use]
    pub fn artifact_id(&self) -> &str {
        &self.artifact.id
    }
}

impl fmt::Display for PlannedOperation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} -> {}",
            self.kind,
            self.artifact_id(),
            self.source,
            self.dest
        )
    }
}

/// An ordered list of operations plus the context used to render them.
#[derive(Debug, Clone)]
pub struct Plan<'a> {
    /// Values substituted into paths and contents.
    pub context: &'a TemplateContext,
    /// Operations in manifest order.
    pub operations: Vec<PlannedOperation<'a>>,
}

impl Plan<'_> {
    /// Header line of the dry-run report.
    pub const DRY_RUN_HEADER: &'static str = "Plan (dry-run)";

    /// Human-readable report: the header followed by one line per operation.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        std::iter::once(Self::DRY_RUN_HEADER.to_string())
            .chain(self.operations.iter().map(ToString::to_string))
            .collect()
    }

    /// Returns `true` if the plan has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Returns `true` if a file name marks a template that must be rendered.
#[must_use]
pub fn is_template(name: &str) -> bool {
    name.contains(TEMPLATE_MARKER)
}

/// Output name for a template source file: the first `.tpl` segment removed.
#[must_use]
pub fn output_name(source_name: &str) -> String {
    source_name.replacen(TEMPLATE_MARKER, "", 1)
}

/// Expand `manifest` for `os` into a plan.
///
/// Artifacts keep manifest order. Every path component goes through the
/// renderer before it is placed into an operation.
#[must_use]
pub fn build_plan<'a>(manifest: &'a Manifest, ctx: &'a TemplateContext, os: Os) -> Plan<'a> {
    let operations = manifest
        .artifacts_for(os)
        .into_iter()
        .map(|artifact| plan_artifact(artifact, ctx))
        .collect();
    Plan {
        context: ctx,
        operations,
    }
}

fn plan_artifact<'a>(artifact: &'a Artifact, ctx: &TemplateContext) -> PlannedOperation<'a> {
    let source = render_text(artifact.source.from(), ctx);
    let to_dir = render_text(artifact.source.to_dir(), ctx);

    match &artifact.source {
        TemplateSource::TemplateFile { out_file, .. } => {
            let source_name = source.rsplit('/').next().unwrap_or(&source);
            let rendered = is_template(source_name);
            let name = out_file.as_deref().map_or_else(
                || output_name(source_name),
                |out| render_text(out, ctx),
            );
            PlannedOperation {
                artifact,
                kind: OperationKind::CopyFile,
                dest: join_display(&to_dir, &name),
                source,
                rendered,
            }
        }
        TemplateSource::TemplateDir { .. } => PlannedOperation {
            artifact,
            kind: OperationKind::CopyDir,
            source,
            dest: to_dir,
            rendered: true,
        },
    }
}

fn join_display(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{name}", dir.trim_end_matches('/'))
    }
}
