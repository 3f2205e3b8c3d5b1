//! Manifest-driven installer for spec-driven development scaffolding.
//!
//! Installs slash commands, agent docs and settings for AI coding agents
//! into a project directory. A JSON manifest lists artifacts; each artifact
//! becomes one or more file operations whose paths and contents are filled
//! from a template context built out of the resolved configuration.
//!
//! The public API is organised into layers:
//!
//! - **[`manifest`]**: load and validate the manifest document
//! - **[`config`]**: merge defaults, persisted settings and CLI flags
//! - **[`template`]**: the substitution context and the renderer
//! - **[`plan`]**: expand artifacts into an ordered list of operations
//! - **[`executor`]**: describe a plan (dry run) or apply it to disk
//! - **[`commands`]**: orchestration behind the `cc-sdd` binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod manifest;
pub mod operations;
pub mod plan;
pub mod platform;
pub mod template;
