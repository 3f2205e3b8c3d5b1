//! Configuration resolution.
//!
//! Three layers feed one [`ResolvedConfig`]: built-in defaults, the persisted
//! user configuration ([`store`]) and explicit CLI arguments. Every field is
//! resolved on its own, so overriding one layout entry for an agent keeps the
//! rest of that agent's built-in layout.
pub mod agents;
pub mod profiles;
pub mod store;

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::platform::{Os, Platform};

pub use agents::{Agent, AgentLayout};
pub use profiles::Profile;
pub use store::{LayoutOverride, UserConfig};

/// Built-in default values for every configurable field.
pub mod defaults {
    /// Agent id.
    pub const AGENT: &str = "claude-code";
    /// Language code.
    pub const LANG: &str = "en";
    /// `auto` means the detected platform.
    pub const OS: &str = "auto";
    /// Spec workspace directory, relative to the target.
    pub const KIRO_DIR: &str = ".kiro";
    /// Overwrite mode.
    pub const OVERWRITE: &str = "skip";
    /// Backup directory, relative to the target.
    pub const BACKUP_DIR: &str = ".cc-sdd.backup";
    /// Manifest profile.
    pub const PROFILE: &str = "full";
}

/// What to do when a planned destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Always replace the existing file.
    Force,
    /// Leave the existing file alone and count it as skipped.
    Skip,
    /// Move the existing file into the backup directory, then write.
    Backup,
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Force => write!(f, "force"),
            Self::Skip => write!(f, "skip"),
            Self::Backup => write!(f, "backup"),
        }
    }
}

impl FromStr for OverwritePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force" => Ok(Self::Force),
            "skip" => Ok(Self::Skip),
            "backup" => Ok(Self::Backup),
            other => Err(ConfigError::UnknownOverwriteMode(other.to_string())),
        }
    }
}

/// The immutable, fully merged configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Agent whose manifest and layout are used.
    pub agent: Agent,
    /// Language code; validated when the template context is built.
    pub lang: String,
    /// Platform used for artifact selection; never `auto`.
    pub os: Os,
    /// Spec workspace directory, relative to the target.
    pub kiro_dir: String,
    /// Policy for destinations that already exist.
    pub overwrite: OverwritePolicy,
    /// Where `backup` moves replaced files, relative to the target.
    pub backup_dir: String,
    /// Manifest variant to install.
    pub profile: Profile,
    /// Layout of the selected agent after overrides.
    pub layout: AgentLayout,
}

/// Merge defaults, the persisted configuration and CLI arguments.
///
/// Precedence per field, highest first: `args`, `persisted`, built-in
/// defaults. An `os` of `auto` (the default) resolves to `platform`.
///
/// # Errors
///
/// Returns an error if the merged agent, os, overwrite mode or profile is not
/// a recognised value.
pub fn resolve(
    args: &UserConfig,
    persisted: &UserConfig,
    platform: &Platform,
) -> Result<ResolvedConfig, ConfigError> {
    let merged = persisted.merged(args);
    let field = |value: &Option<String>, default: &str| -> String {
        value.clone().unwrap_or_else(|| default.to_string())
    };

    let agent: Agent = field(&merged.agent, defaults::AGENT).parse()?;
    let os = match field(&merged.os, defaults::OS).as_str() {
        "auto" => platform.os,
        other => other.parse()?,
    };
    let overwrite = field(&merged.overwrite, defaults::OVERWRITE).parse()?;
    let profile = field(&merged.profile, defaults::PROFILE).parse()?;
    let layout = agent
        .default_layout()
        .with_override(merged.agent_layouts.get(agent.id()));

    Ok(ResolvedConfig {
        agent,
        lang: field(&merged.lang, defaults::LANG),
        os,
        kiro_dir: field(&merged.kiro_dir, defaults::KIRO_DIR),
        overwrite,
        backup_dir: field(&merged.backup_dir, defaults::BACKUP_DIR),
        profile,
        layout,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn mac() -> Platform {
        Platform::new(Os::Mac)
    }

    fn layouts(agent: &str, layout: LayoutOverride) -> BTreeMap<String, LayoutOverride> {
        BTreeMap::from([(agent.to_string(), layout)])
    }

    #[test]
    fn defaults_when_nothing_is_given() {
        let resolved = resolve(&UserConfig::default(), &UserConfig::default(), &mac()).unwrap();
        assert_eq!(resolved.agent, Agent::ClaudeCode);
        assert_eq!(resolved.lang, "en");
        assert_eq!(resolved.os, Os::Mac);
        assert_eq!(resolved.kiro_dir, ".kiro");
        assert_eq!(resolved.overwrite, OverwritePolicy::Skip);
        assert_eq!(resolved.backup_dir, ".cc-sdd.backup");
        assert_eq!(resolved.profile, Profile::Full);
        assert_eq!(resolved.layout.commands_dir, ".claude/commands/kiro");
        assert_eq!(resolved.layout.agent_dir, ".claude");
        assert_eq!(resolved.layout.doc_file, "CLAUDE.md");
    }

    #[test]
    fn args_beat_persisted_beat_defaults() {
        let persisted = UserConfig {
            agent: Some("gemini-cli".into()),
            lang: Some("ja".into()),
            kiro_dir: Some("docs/kiro".into()),
            ..UserConfig::default()
        };
        let args = UserConfig {
            lang: Some("de".into()),
            ..UserConfig::default()
        };
        let resolved = resolve(&args, &persisted, &mac()).unwrap();
        assert_eq!(resolved.agent, Agent::GeminiCli);
        assert_eq!(resolved.lang, "de");
        assert_eq!(resolved.kiro_dir, "docs/kiro");
        assert_eq!(resolved.layout.agent_dir, ".gemini");
    }

    #[test]
    fn single_layout_field_override_keeps_other_builtins() {
        let persisted = UserConfig {
            agent_layouts: layouts(
                "claude-code",
                LayoutOverride {
                    commands_dir: Some(".custom/commands".into()),
                    ..LayoutOverride::default()
                },
            ),
            ..UserConfig::default()
        };
        let resolved = resolve(&UserConfig::default(), &persisted, &mac()).unwrap();
        assert_eq!(resolved.layout.commands_dir, ".custom/commands");
        assert_eq!(resolved.layout.agent_dir, ".claude");
        assert_eq!(resolved.layout.doc_file, "CLAUDE.md");
    }

    #[test]
    fn layout_override_for_other_agent_is_ignored() {
        let persisted = UserConfig {
            agent_layouts: layouts(
                "gemini-cli",
                LayoutOverride {
                    commands_dir: Some(".gemini/custom".into()),
                    ..LayoutOverride::default()
                },
            ),
            ..UserConfig::default()
        };
        let resolved = resolve(&UserConfig::default(), &persisted, &mac()).unwrap();
        assert_eq!(resolved.layout.commands_dir, ".claude/commands/kiro");
    }

    #[test]
    fn full_layout_override() {
        let persisted = UserConfig {
            agent_layouts: layouts(
                "claude-code",
                LayoutOverride {
                    commands_dir: Some(".custom/commands/path".into()),
                    agent_dir: Some(".custom-agent".into()),
                    doc_file: Some("CUSTOM-DOC.md".into()),
                },
            ),
            ..UserConfig::default()
        };
        let args = UserConfig {
            kiro_dir: Some("custom-kiro".into()),
            ..UserConfig::default()
        };
        let resolved = resolve(&args, &persisted, &mac()).unwrap();
        assert_eq!(resolved.kiro_dir, "custom-kiro");
        assert_eq!(resolved.layout.agent_dir, ".custom-agent");
        assert_eq!(resolved.layout.doc_file, "CUSTOM-DOC.md");
        assert_eq!(resolved.layout.commands_dir, ".custom/commands/path");
    }

    #[test]
    fn auto_os_follows_platform_and_explicit_os_wins() {
        let linux = Platform::new(Os::Linux);
        let resolved = resolve(&UserConfig::default(), &UserConfig::default(), &linux).unwrap();
        assert_eq!(resolved.os, Os::Linux);

        let args = UserConfig {
            os: Some("windows".into()),
            ..UserConfig::default()
        };
        let resolved = resolve(&args, &UserConfig::default(), &linux).unwrap();
        assert_eq!(resolved.os, Os::Windows);
    }

    #[test]
    fn unknown_values_are_rejected() {
        let bad_agent = UserConfig {
            agent: Some("vim".into()),
            ..UserConfig::default()
        };
        assert!(matches!(
            resolve(&bad_agent, &UserConfig::default(), &mac()),
            Err(ConfigError::UnknownAgent(_))
        ));

        let bad_mode = UserConfig {
            overwrite: Some("prompt".into()),
            ..UserConfig::default()
        };
        assert!(matches!(
            resolve(&UserConfig::default(), &bad_mode, &mac()),
            Err(ConfigError::UnknownOverwriteMode(_))
        ));
    }

    #[test]
    fn unsupported_lang_is_left_for_the_context_builder() {
        let args = UserConfig {
            lang: Some("xx".into()),
            ..UserConfig::default()
        };
        let resolved = resolve(&args, &UserConfig::default(), &mac()).unwrap();
        assert_eq!(resolved.lang, "xx");
    }

    #[test]
    fn overwrite_policy_parses_all_modes() {
        for (text, policy) in [
            ("force", OverwritePolicy::Force),
            ("skip", OverwritePolicy::Skip),
            ("backup", OverwritePolicy::Backup),
        ] {
            assert_eq!(text.parse::<OverwritePolicy>().unwrap(), policy);
            assert_eq!(policy.to_string(), text);
        }
    }
}
