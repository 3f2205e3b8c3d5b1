#![allow(clippy::expect_used, clippy::unwrap_used, deprecated)]
//! Integration tests that run the `cc-sdd` binary.
//!
//! Stdout is a stable surface for tooling: it must carry the dry-run report
//! or the apply summary and nothing else. Progress logging goes to stderr.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::IntegrationTestContext;

fn cc_sdd(ctx: &IntegrationTestContext, cache: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cc-sdd").expect("cc-sdd binary should exist");
    cmd.env("XDG_CACHE_HOME", cache.path())
        .env_remove("CC_SDD_TEMPLATES")
        .arg("--templates")
        .arg(ctx.templates_path())
        .arg("--target")
        .arg(ctx.target_path());
    cmd
}

#[test]
fn dry_run_stdout_is_exactly_the_report() {
    let ctx = IntegrationTestContext::new();
    let cache = tempfile::tempdir().unwrap();

    cc_sdd(&ctx, &cache)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(
            "Plan (dry-run)\n\
             [templateFile] doc_main: templates/docs/AGENT.tpl.md -> ./CLAUDE.md\n\
             [templateDir] commands: templates/commands -> .claude/commands/kiro\n\
             [templateFile] settings: templates/settings/rules.tpl.json -> .kiro/settings/rules.json\n",
        )
        .stderr(predicate::str::contains("Loading manifest"));
}

#[test]
fn apply_stdout_is_exactly_the_summary() {
    let ctx = IntegrationTestContext::new();
    let cache = tempfile::tempdir().unwrap();

    cc_sdd(&ctx, &cache)
        .arg("--yes")
        .assert()
        .success()
        .stdout("Setup completed: written=4, skipped=0\n");
    assert!(ctx.target_file("CLAUDE.md").exists());
}

#[test]
fn piped_stderr_has_no_escape_codes() {
    let ctx = IntegrationTestContext::new();
    let cache = tempfile::tempdir().unwrap();

    cc_sdd(&ctx, &cache)
        .args(["--dry-run", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Resolving configuration"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn missing_manifest_exits_one_with_error_on_stderr() {
    let ctx = IntegrationTestContext::new();
    let cache = tempfile::tempdir().unwrap();

    cc_sdd(&ctx, &cache)
        .args(["--dry-run", "--manifest", "/path/that/does/not/exist/manifest.json"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Manifest not found"));
}

#[test]
fn version_flag_exits_zero() {
    let ctx = IntegrationTestContext::new();
    let cache = tempfile::tempdir().unwrap();

    cc_sdd(&ctx, &cache)
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("cc-sdd"));
}
