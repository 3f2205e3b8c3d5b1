//! The installer run: resolve, plan, then describe or apply.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::Confirm;
use crate::cli::Cli;
use crate::config::{self, ResolvedConfig, UserConfig, profiles, store};
use crate::error::SddError;
use crate::executor::Executor;
use crate::logging::Log;
use crate::manifest::{self, Manifest};
use crate::operations::SystemFileSystemOps;
use crate::plan::build_plan;
use crate::platform::Platform;
use crate::template::TemplateContext;

/// Environment variable naming the templates root.
pub const TEMPLATES_ENV: &str = "CC_SDD_TEMPLATES";

/// Run the installer: resolve configuration, plan, then report or apply.
///
/// The dry-run report and the apply summary go to `out`; progress goes to
/// `log`.
///
/// # Errors
///
/// Returns an error if configuration cannot be resolved, the manifest cannot
/// be loaded, the language is unsupported, or any planned operation failed.
pub fn run(
    cli: &Cli,
    platform: &Platform,
    out: &mut dyn Write,
    confirm: &dyn Confirm,
    log: &dyn Log,
) -> Result<()> {
    let target = match &cli.target {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let templates_root = resolve_templates_root(cli.templates.as_deref())?;
    log.debug(&format!("templates root: {}", templates_root.display()));

    let Prepared {
        persisted,
        overrides,
        config: resolved,
        manifest,
        context: ctx,
    } = prepare(cli, platform, &target, &templates_root, log)?;
    let plan = build_plan(&manifest, &ctx, resolved.os);
    log.debug(&format!("{} planned operation(s)", plan.operations.len()));
    if plan.is_empty() {
        log.warn(&format!("no artifacts apply to {}", resolved.os));
    }

    if cli.dry_run {
        for line in Executor::describe(&plan) {
            writeln!(out, "{line}")?;
        }
        log.dry_run(&format!(
            "{} operation(s) planned, nothing written",
            plan.operations.len()
        ));
        return Ok(());
    }

    if !cli.yes {
        let prompt = format!(
            "Apply {} operation(s) to {}?",
            plan.operations.len(),
            target.display()
        );
        if !confirm.confirm(&prompt).context("failed to read confirmation")? {
            log.info("aborted, nothing written");
            return Ok(());
        }
    }

    log.stage("Applying");
    let result = Executor::new(&templates_root, &target, resolved.backup_dir.as_str(), log)
        .apply(&plan, resolved.overwrite);

    writeln!(out, "{}", result.summary())?;
    if let Some(note) = resolved.agent.post_install_note() {
        writeln!(out, "{note}")?;
    }

    let failed = result.errors.len();
    if failed > 0 {
        anyhow::bail!("{failed} operation(s) failed");
    }

    if cli.save_config {
        let path = store::save(&target, &persisted.merged(&overrides))?;
        log.info(&format!("saved configuration to {}", path.display()));
    }
    Ok(())
}

/// Inputs of one plan, resolved from flags, persisted settings and disk.
#[derive(Debug)]
pub struct Prepared {
    /// Settings loaded from the target's config file.
    pub persisted: UserConfig,
    /// Settings given on the command line.
    pub overrides: UserConfig,
    /// Effective configuration.
    pub config: ResolvedConfig,
    /// Loaded manifest for the selected agent and profile.
    pub manifest: Manifest,
    /// Substitution values derived from `config`.
    pub context: TemplateContext,
}

/// Resolve configuration, load the manifest and build the template context.
///
/// Nothing is written. `--manifest` wins over the profile's bundled manifest
/// under `templates_root`.
///
/// # Errors
///
/// Returns [`SddError::Config`] for an unreadable config file or unknown
/// setting, [`SddError::Manifest`] if the manifest cannot be loaded, and
/// [`SddError::Template`] for an unsupported language.
pub fn prepare(
    cli: &Cli,
    platform: &Platform,
    target: &Path,
    templates_root: &Path,
    log: &dyn Log,
) -> Result<Prepared, SddError> {
    log.stage("Resolving configuration");
    let persisted = store::load(target)?;
    let overrides = cli.overrides();
    let config = config::resolve(&overrides, &persisted, platform)?;
    log.info(&format!(
        "agent: {}, lang: {}, os: {}, profile: {}",
        config.agent, config.lang, config.os, config.profile
    ));

    log.stage("Loading manifest");
    let manifest_path = cli.manifest.clone().unwrap_or_else(|| {
        profiles::manifest_path(templates_root, config.agent, config.profile, &SystemFileSystemOps)
    });
    let manifest = manifest::load(&manifest_path)?;
    log.info(&format!("manifest: {}", manifest_path.display()));

    let context = TemplateContext::build(&config)?;
    Ok(Prepared {
        persisted,
        overrides,
        config,
        manifest,
        context,
    })
}

/// Locate the templates root.
///
/// Checked in order: the `--templates` flag, `CC_SDD_TEMPLATES`, the
/// directories around the running binary, and finally the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_templates_root(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root.to_path_buf());
    }

    if let Ok(root) = std::env::var(TEMPLATES_ENV) {
        return Ok(PathBuf::from(root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [
            parent.to_path_buf(), // installed next to the binary
            parent.join(".."),    // bin/ → package root
            parent.join("../.."), // target/release/ → crate root
        ];
        for candidate in &candidates {
            if profiles::manifests_dir(candidate).is_dir() {
                return Ok(dunce::canonicalize(candidate)?);
            }
        }
    }

    Ok(std::env::current_dir()?)
}
