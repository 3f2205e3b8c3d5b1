//! Operating system detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Operating system family targeted by generated scaffolding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// macOS (`darwin`).
    Mac,
    /// Windows (`win32`).
    Windows,
    /// Linux and other Unix-likes.
    Linux,
}

impl Os {
    /// The variant used when a manifest has nothing qualified for the
    /// requested OS.
    pub const FALLBACK: Self = Self::Mac;

    /// Map a runtime platform name (`darwin`, `win32`, `linux`, ...) onto an
    /// OS family. Unknown Unix-likes are treated as Linux.
    #[must_use]
    pub fn from_runtime_name(name: &str) -> Self {
        match name {
            "darwin" | "macos" => Self::Mac,
            "win32" | "windows" => Self::Windows,
            _ => Self::Linux,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mac => write!(f, "mac"),
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
        }
    }
}

impl FromStr for Os {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mac" => Ok(Self::Mac),
            "windows" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            other => Err(ConfigError::UnknownOs(other.to_string())),
        }
    }
}

/// Platform information for the current process.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Detected operating system family.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    /// Create a platform with an explicit OS.
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Build a platform from a runtime name such as `darwin` or `linux`.
    #[must_use]
    pub fn from_runtime_name(name: &str) -> Self {
        Self::new(Os::from_runtime_name(name))
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "macos") {
            Os::Mac
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            Os::Linux
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn platform_detect_matches_target() {
        let p = Platform::detect();
        if cfg!(target_os = "linux") {
            assert_eq!(p.os, Os::Linux);
        }
    }

    #[test]
    fn runtime_names_map_to_os() {
        assert_eq!(Os::from_runtime_name("darwin"), Os::Mac);
        assert_eq!(Os::from_runtime_name("win32"), Os::Windows);
        assert_eq!(Os::from_runtime_name("linux"), Os::Linux);
        assert_eq!(Os::from_runtime_name("freebsd"), Os::Linux);
    }

    #[test]
    fn os_display_round_trips_through_from_str() {
        for os in [Os::Mac, Os::Windows, Os::Linux] {
            assert_eq!(os.to_string().parse::<Os>().unwrap(), os);
        }
    }

    #[test]
    fn unknown_os_is_rejected() {
        let err = "beos".parse::<Os>().unwrap_err();
        assert!(err.to_string().contains("beos"));
    }

    #[test]
    fn os_serde_uses_lowercase_names() {
        let os: Os = serde_json::from_str("\"mac\"").unwrap();
        assert_eq!(os, Os::Mac);
        assert_eq!(serde_json::to_string(&Os::Windows).unwrap(), "\"windows\"");
    }

    #[test]
    fn fallback_is_mac() {
        assert_eq!(Os::FALLBACK, Os::Mac);
    }
}
