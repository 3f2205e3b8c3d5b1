//! Persisted user configuration (`.cc-sdd.json` in the target directory).
//!
//! The file is optional. A missing file, a target that is not a directory,
//! or a document containing only `null` all load as an empty configuration.
//! Saving writes pretty-printed JSON with a stable field order so that a
//! load/save cycle is byte-for-byte stable.
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the target directory.
pub const CONFIG_FILE_NAME: &str = ".cc-sdd.json";

/// Partial per-agent layout override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOverride {
    /// Replaces [`AgentLayout::commands_dir`](super::AgentLayout::commands_dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands_dir: Option<String>,
    /// Replaces [`AgentLayout::agent_dir`](super::AgentLayout::agent_dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_dir: Option<String>,
    /// Replaces [`AgentLayout::doc_file`](super::AgentLayout::doc_file).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_file: Option<String>,
}

impl LayoutOverride {
    fn merged(&self, over: &Self) -> Self {
        Self {
            commands_dir: over.commands_dir.clone().or_else(|| self.commands_dir.clone()),
            agent_dir: over.agent_dir.clone().or_else(|| self.agent_dir.clone()),
            doc_file: over.doc_file.clone().or_else(|| self.doc_file.clone()),
        }
    }
}

/// User configuration as stored on disk and as collected from CLI flags.
///
/// Every field is optional; absent fields fall through to the next layer
/// during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Agent id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// `mac`, `windows`, `linux` or `auto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Spec workspace directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kiro_dir: Option<String>,
    /// `skip`, `force` or `backup`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<String>,
    /// Backup directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<String>,
    /// `full` or `minimal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Layout overrides keyed by agent id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub agent_layouts: BTreeMap<String, LayoutOverride>,
}

impl UserConfig {
    /// Field-by-field merge where values present in `over` win.
    ///
    /// Layout overrides merge per agent and per field.
    #[must_use]
    pub fn merged(&self, over: &Self) -> Self {
        let pick = |mine: &Option<String>, theirs: &Option<String>| {
            theirs.clone().or_else(|| mine.clone())
        };

        let mut agent_layouts = self.agent_layouts.clone();
        for (agent, layer) in &over.agent_layouts {
            let merged = agent_layouts
                .get(agent)
                .map_or_else(|| layer.clone(), |base| base.merged(layer));
            agent_layouts.insert(agent.clone(), merged);
        }

        Self {
            agent: pick(&self.agent, &over.agent),
            lang: pick(&self.lang, &over.lang),
            os: pick(&self.os, &over.os),
            kiro_dir: pick(&self.kiro_dir, &over.kiro_dir),
            overwrite: pick(&self.overwrite, &over.overwrite),
            backup_dir: pick(&self.backup_dir, &over.backup_dir),
            profile: pick(&self.profile, &over.profile),
            agent_layouts,
        }
    }
}

/// Path of the config file for `dir`.
#[must_use]
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load the persisted configuration from `dir`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidJson`] if the file exists but does not
/// parse, or [`ConfigError::Io`] for read failures other than absence.
pub fn load(dir: &Path) -> Result<UserConfig, ConfigError> {
    let path = config_path(dir);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            return Ok(UserConfig::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    let parsed: Option<UserConfig> =
        serde_json::from_str(&text).map_err(|source| ConfigError::InvalidJson {
            path: path.clone(),
            source,
        })?;
    Ok(parsed.unwrap_or_default())
}

/// Write `config` to `dir`, creating the directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the directory or file cannot be written.
pub fn save(dir: &Path, config: &UserConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path(dir);
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut text = serde_json::to_string_pretty(config).map_err(|source| {
        ConfigError::InvalidJson {
            path: path.clone(),
            source,
        }
    })?;
    text.push('\n');

    std::fs::write(&path, text).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
