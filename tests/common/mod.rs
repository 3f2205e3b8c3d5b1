// Shared helpers for integration tests.
//
// Provides a temporary templates root plus an empty project directory and a
// fluent builder so each integration test can describe the manifests and
// template files it needs without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cc_sdd_cli::cli::Cli;
use cc_sdd_cli::commands::{Confirm, setup};
use cc_sdd_cli::logging::Log;
use cc_sdd_cli::platform::{Os, Platform};
use clap::Parser as _;

/// Manifest used by most tests: one doc file, one command directory and one
/// structured settings file.
pub const DEFAULT_MANIFEST: &str = r#"{
  "version": 1,
  "artifacts": [
    {
      "id": "doc_main",
      "source": {
        "type": "templateFile",
        "from": "templates/docs/AGENT.tpl.md",
        "toDir": ".",
        "outFile": "{{AGENT_DOC}}"
      }
    },
    {
      "id": "commands",
      "source": {
        "type": "templateDir",
        "from": "templates/commands",
        "toDir": "{{AGENT_COMMANDS_DIR}}"
      }
    },
    {
      "id": "settings",
      "source": {
        "type": "templateFile",
        "from": "templates/settings/rules.tpl.json",
        "toDir": "{{KIRO_DIR}}/settings"
      }
    }
  ]
}"#;

/// Write the template files referenced by [`DEFAULT_MANIFEST`] into `root`.
pub fn write_default_templates(root: &Path) {
    write(
        root,
        "templates/docs/AGENT.tpl.md",
        "# {{AGENT}}\n\n{{DEV_GUIDELINES}}\n",
    );
    write(
        root,
        "templates/commands/spec-init.tpl.md",
        "Create specs under {{KIRO_DIR}}/specs\n",
    );
    write(
        root,
        "templates/commands/spec-status.tpl.md",
        "Status for {{AGENT}}\n",
    );
    write(
        root,
        "templates/settings/rules.tpl.json",
        r#"{"agent": "{{AGENT}}", "lang": "{{LANG_CODE}}", "strict": true}"#,
    );
}

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(&path, contents).expect("write fixture file");
}

/// A templates root and a target project, each in its own temp directory.
pub struct IntegrationTestContext {
    /// Templates root (holds `templates/manifests/`).
    pub templates: tempfile::TempDir,
    /// Project directory the installer writes into.
    pub target: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a context whose templates root serves [`DEFAULT_MANIFEST`] for
    /// every agent.
    pub fn new() -> Self {
        TestContextBuilder::new().build()
    }

    pub fn templates_path(&self) -> &Path {
        self.templates.path()
    }

    pub fn target_path(&self) -> &Path {
        self.target.path()
    }

    /// Path of `rel` inside the target project.
    pub fn target_file(&self, rel: &str) -> PathBuf {
        self.target.path().join(rel)
    }

    /// Contents of `rel` inside the target project, if present.
    pub fn read_target(&self, rel: &str) -> Option<String> {
        std::fs::read_to_string(self.target_file(rel)).ok()
    }

    /// Parse `args` as if given after `cc-sdd`, with `--templates` and
    /// `--target` pointing at this context.
    pub fn cli(&self, args: &[&str]) -> Cli {
        let mut argv = vec![
            "cc-sdd".to_string(),
            "--templates".to_string(),
            self.templates.path().display().to_string(),
            "--target".to_string(),
            self.target.path().display().to_string(),
        ];
        argv.extend(args.iter().map(ToString::to_string));
        Cli::parse_from(argv)
    }

    /// Run the installer on `os` and answer every confirmation with yes.
    pub fn run(&self, args: &[&str], os: Os) -> RunOutput {
        self.run_with(args, os, &Answer(true))
    }

    /// Run the installer on `os` with the given confirmation behaviour.
    pub fn run_with(&self, args: &[&str], os: Os, confirm: &dyn Confirm) -> RunOutput {
        let log = RecordingLog::default();
        let mut out = Vec::new();
        let result = setup::run(&self.cli(args), &Platform::new(os), &mut out, confirm, &log);
        RunOutput {
            result,
            stdout: String::from_utf8(out).expect("utf-8 output"),
            errors: log.errors(),
        }
    }
}

/// What a single installer run produced.
pub struct RunOutput {
    pub result: anyhow::Result<()>,
    /// Report and summary lines.
    pub stdout: String,
    /// Messages logged at error level.
    pub errors: Vec<String>,
}

impl RunOutput {
    /// Process exit code `main` would produce.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.result.is_err())
    }
}

/// Fixed answer to every confirmation prompt.
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&self, _prompt: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

/// [`Log`] that keeps error messages and drops everything else.
#[derive(Default)]
pub struct RecordingLog {
    errors: Mutex<Vec<String>>,
}

impl RecordingLog {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("log mutex").clone()
    }
}

impl Log for RecordingLog {
    fn stage(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn debug(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, msg: &str) {
        self.errors.lock().expect("log mutex").push(msg.to_string());
    }
    fn dry_run(&self, _msg: &str) {}
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Manifests are written under `templates/manifests/` in the templates root.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
    default_manifests: bool,
}

impl TestContextBuilder {
    /// Begin building a context with the default templates.
    pub fn new() -> Self {
        let ctx = IntegrationTestContext {
            templates: tempfile::tempdir().expect("create templates dir"),
            target: tempfile::tempdir().expect("create target dir"),
        };
        write_default_templates(ctx.templates.path());
        Self {
            ctx,
            default_manifests: true,
        }
    }

    /// Do not install [`DEFAULT_MANIFEST`] for every agent.
    pub fn without_default_manifests(mut self) -> Self {
        self.default_manifests = false;
        self
    }

    /// Write `templates/manifests/<name>` with `contents`.
    pub fn with_manifest(self, name: &str, contents: &str) -> Self {
        write(
            self.ctx.templates.path(),
            &format!("templates/manifests/{name}"),
            contents,
        );
        self
    }

    /// Write an additional template file relative to the templates root.
    pub fn with_template(self, rel: &str, contents: &str) -> Self {
        write(self.ctx.templates.path(), rel, contents);
        self
    }

    /// Pre-populate a file inside the target project.
    pub fn with_target_file(self, rel: &str, contents: &str) -> Self {
        write(self.ctx.target.path(), rel, contents);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        if self.default_manifests {
            let manifests = self.ctx.templates.path().join("templates/manifests");
            for agent in ["claude-code", "gemini-cli", "qwen-code", "cursor"] {
                let path = manifests.join(format!("{agent}.json"));
                if !path.exists() {
                    write(
                        self.ctx.templates.path(),
                        &format!("templates/manifests/{agent}.json"),
                        DEFAULT_MANIFEST,
                    );
                }
            }
        }
        self.ctx
    }
}
