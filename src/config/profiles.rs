//! Manifest profiles and manifest path selection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::operations::FileSystemOps;

use super::agents::Agent;

/// Which manifest variant to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// The complete manifest for the agent.
    Full,
    /// A reduced manifest, when the agent ships one.
    Minimal,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Minimal => write!(f, "minimal"),
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "minimal" => Ok(Self::Minimal),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

/// Directory holding the bundled manifests under a templates root.
#[must_use]
pub fn manifests_dir(templates_root: &Path) -> PathBuf {
    templates_root.join("templates").join("manifests")
}

/// Pick the manifest for `agent` under `templates_root`.
///
/// The minimal profile uses `<agent>-min.json` when it exists and falls back
/// to the full `<agent>.json` otherwise.
#[must_use]
pub fn manifest_path(
    templates_root: &Path,
    agent: Agent,
    profile: Profile,
    fs_ops: &dyn FileSystemOps,
) -> PathBuf {
    let dir = manifests_dir(templates_root);
    let full = dir.join(format!("{}.json", agent.id()));
    match profile {
        Profile::Full => full,
        Profile::Minimal => {
            let minimal = dir.join(format!("{}-min.json", agent.id()));
            if fs_ops.is_file(&minimal) {
                minimal
            } else {
                full
            }
        }
    }
}
