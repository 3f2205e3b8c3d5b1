//! Domain-specific error types for the installer.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`ManifestError`],
//! [`TemplateError`]) while the command layer converts them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! SddError
//! ├── Manifest(ManifestError)   : manifest read, JSON syntax, schema
//! ├── Config(ConfigError)       : persisted config, unknown agent/os/mode
//! ├── Template(TemplateError)   : unsupported language, malformed JSON template
//! └── Execution(ExecutionError) : per-operation filesystem failures
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the installer.
#[derive(Error, Debug)]
pub enum SddError {
    /// Manifest could not be loaded or failed validation.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration could not be loaded or resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Template context or rendering failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A planned operation failed while being applied.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Errors raised while loading and validating a manifest document.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file does not exist.
    #[error("Manifest not found: {}", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The manifest file is not valid JSON.
    #[error("Invalid JSON in manifest {}: {source}", .path.display())]
    InvalidJson {
        /// Path of the manifest.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The manifest parsed but does not have the required shape.
    #[error("Invalid manifest: {0}")]
    InvalidSchema(String),

    /// Any other I/O failure while reading the manifest (permissions, ...).
    #[error("failed to read manifest {}: {source}", .path.display())]
    Io {
        /// Path of the manifest.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised while loading, saving or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The agent identifier is not one of the supported agents.
    #[error("Unknown agent '{0}': must be one of claude-code, gemini-cli, qwen-code, cursor")]
    UnknownAgent(String),

    /// The OS selector is not recognised.
    #[error("Unknown os '{0}': must be one of mac, windows, linux, auto")]
    UnknownOs(String),

    /// The overwrite mode is not recognised.
    #[error("Unknown overwrite mode '{0}': must be one of force, skip, backup")]
    UnknownOverwriteMode(String),

    /// The manifest profile is not recognised.
    #[error("Unknown profile '{0}': must be one of full, minimal")]
    UnknownProfile(String),

    /// The persisted configuration file is not valid JSON.
    #[error("Invalid JSON in config file {}: {source}", .path.display())]
    InvalidJson {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// An I/O error occurred while reading or writing the config file.
    #[error("IO error on config file {}: {source}", .path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised by the template context builder and renderer.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// No guidance string exists for the language code.
    #[error("Unsupported language '{0}'")]
    UnsupportedLanguage(String),

    /// Structured rendering produced text that is not valid JSON.
    #[error("Malformed template: {source}")]
    MalformedTemplate {
        /// Parse error raised on the substituted text.
        #[from]
        source: serde_json::Error,
    },
}

/// A single planned operation that failed while being applied.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Filesystem failure (missing source, permissions, ...).
    #[error("[{artifact}] failed to {action} {}: {source}", .path.display())]
    Io {
        /// Artifact the operation was planned from.
        artifact: String,
        /// What was being attempted (`read`, `write`, `back up`, ...).
        action: &'static str,
        /// Path the action was attempted on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Structured template rendering failed for one file.
    #[error("[{artifact}] failed to render {}: {source}", .path.display())]
    Template {
        /// Artifact the operation was planned from.
        artifact: String,
        /// Template source path.
        path: PathBuf,
        /// Underlying template error.
        source: TemplateError,
    },

    /// Two files of one template directory map onto the same destination.
    #[error(
        "[{artifact}] {} and {} both produce {}; keeping the first",
        .first.display(),
        .path.display(),
        .dest.display()
    )]
    DuplicateDestination {
        /// Artifact the operation was planned from.
        artifact: String,
        /// Template source that was installed.
        first: PathBuf,
        /// Template source that was dropped.
        path: PathBuf,
        /// Shared destination.
        dest: PathBuf,
    },
}

impl ExecutionError {
    /// Identifier of the artifact whose operation failed.
    #[must_use]
    pub fn artifact(&self) -> &str {
        match self {
            Self::Io { artifact, .. }
            | Self::Template { artifact, .. }
            | Self::DuplicateDestination { artifact, .. } => artifact,
        }
    }
}
