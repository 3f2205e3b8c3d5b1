//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::UserConfig;

/// Version reported by `--version`, stamped by `build.rs` when available.
pub const VERSION: &str = match option_env!("CC_SDD_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point for the installer.
#[derive(Parser, Debug)]
#[command(
    name = "cc-sdd",
    about = "Install spec-driven development commands and docs for AI coding agents",
    version = VERSION,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Print the plan without writing anything
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Target agent (claude-code, gemini-cli, qwen-code, cursor)
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Language code for generated documents (en, ja, zh-TW, ...)
    #[arg(long)]
    pub lang: Option<String>,

    /// Target operating system (mac, windows, linux, auto)
    #[arg(long)]
    pub os: Option<String>,

    /// What to do with existing files (skip, force, backup)
    #[arg(long)]
    pub overwrite: Option<String>,

    /// Directory for steering and spec documents
    #[arg(long)]
    pub kiro_dir: Option<String>,

    /// Directory (relative to the target) receiving backups
    #[arg(long)]
    pub backup_dir: Option<String>,

    /// Manifest profile (full, minimal)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Use this manifest instead of the bundled one
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Project directory to install into (default: current directory)
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Override the templates root directory
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Persist the effective settings to the project config file
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Configuration layer formed by the flags given on the command line.
    #[must_use]
    pub fn overrides(&self) -> UserConfig {
        UserConfig {
            agent: self.agent.clone(),
            lang: self.lang.clone(),
            os: self.os.clone(),
            kiro_dir: self.kiro_dir.clone(),
            overwrite: self.overwrite.clone(),
            backup_dir: self.backup_dir.clone(),
            profile: self.profile.clone(),
            ..UserConfig::default()
        }
    }
}
