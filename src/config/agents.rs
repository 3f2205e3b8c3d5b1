//! Supported agents and their default file layouts.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

use super::store::LayoutOverride;

/// A supported AI coding agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Agent {
    /// `claude-code`
    ClaudeCode,
    /// `gemini-cli`
    GeminiCli,
    /// `qwen-code`
    QwenCode,
    /// `cursor`
    Cursor,
}

impl Agent {
    /// All supported agents in display order.
    pub const ALL: [Self; 4] = [Self::ClaudeCode, Self::GeminiCli, Self::QwenCode, Self::Cursor];

    /// Identifier used on the command line, in manifests and in the config
    /// file.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ClaudeCode => "claude-code",
            Self::GeminiCli => "gemini-cli",
            Self::QwenCode => "qwen-code",
            Self::Cursor => "cursor",
        }
    }

    /// Built-in layout for this agent.
    #[must_use]
    pub fn default_layout(self) -> AgentLayout {
        let (commands_dir, agent_dir, doc_file) = match self {
            Self::ClaudeCode => (".claude/commands/kiro", ".claude", "CLAUDE.md"),
            Self::GeminiCli => (".gemini/commands/kiro", ".gemini", "GEMINI.md"),
            Self::QwenCode => (".qwen/commands/kiro", ".qwen", "QWEN.md"),
            Self::Cursor => (".cursor/commands/kiro", ".cursor", "AGENTS.md"),
        };
        AgentLayout {
            commands_dir: commands_dir.to_string(),
            agent_dir: agent_dir.to_string(),
            doc_file: doc_file.to_string(),
        }
    }

    /// Advisory printed after a successful install, if the agent needs one.
    #[must_use]
    pub const fn post_install_note(self) -> Option<&'static str> {
        match self {
            Self::GeminiCli => Some(
                "Note: restart Gemini CLI so it picks up the new commands in .gemini/commands/kiro",
            ),
            Self::QwenCode => Some(
                "Note: restart Qwen Code so it picks up the new commands in .qwen/commands/kiro",
            ),
            Self::ClaudeCode | Self::Cursor => None,
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Agent {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|agent| agent.id() == s)
            .ok_or_else(|| ConfigError::UnknownAgent(s.to_string()))
    }
}

/// Where an agent keeps its files inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentLayout {
    /// Directory holding slash-command files.
    pub commands_dir: String,
    /// Agent-owned directory at the project root.
    pub agent_dir: String,
    /// Name of the agent's top-level guidance document.
    pub doc_file: String,
}

impl AgentLayout {
    /// Apply a partial override; fields absent from `layer` are kept.
    #[must_use]
    pub fn with_override(mut self, layer: Option<&LayoutOverride>) -> Self {
        if let Some(layer) = layer {
            if let Some(dir) = &layer.commands_dir {
                self.commands_dir.clone_from(dir);
            }
            if let Some(dir) = &layer.agent_dir {
                self.agent_dir.clone_from(dir);
            }
            if let Some(file) = &layer.doc_file {
                self.doc_file.clone_from(file);
            }
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for agent in Agent::ALL {
            assert_eq!(agent.id().parse::<Agent>().unwrap(), agent);
            assert_eq!(agent.to_string(), agent.id());
        }
    }

    #[test]
    fn unknown_agent_is_rejected() {
        assert!(matches!(
            "copilot".parse::<Agent>(),
            Err(ConfigError::UnknownAgent(name)) if name == "copilot"
        ));
    }

    #[test]
    fn builtin_layouts() {
        let gemini = Agent::GeminiCli.default_layout();
        assert_eq!(gemini.commands_dir, ".gemini/commands/kiro");
        assert_eq!(gemini.agent_dir, ".gemini");
        assert_eq!(gemini.doc_file, "GEMINI.md");

        let qwen = Agent::QwenCode.default_layout();
        assert_eq!(qwen.agent_dir, ".qwen");
        assert_eq!(qwen.doc_file, "QWEN.md");

        let cursor = Agent::Cursor.default_layout();
        assert_eq!(cursor.commands_dir, ".cursor/commands/kiro");
        assert_eq!(cursor.doc_file, "AGENTS.md");
    }

    #[test]
    fn override_replaces_only_given_fields() {
        let layer = LayoutOverride {
            doc_file: Some("README-AI.md".into()),
            ..LayoutOverride::default()
        };
        let layout = Agent::ClaudeCode.default_layout().with_override(Some(&layer));
        assert_eq!(layout.doc_file, "README-AI.md");
        assert_eq!(layout.commands_dir, ".claude/commands/kiro");
        assert_eq!(layout.agent_dir, ".claude");
    }

    #[test]
    fn no_override_keeps_defaults() {
        let layout = Agent::Cursor.default_layout().with_override(None);
        assert_eq!(layout, Agent::Cursor.default_layout());
    }

    #[test]
    fn post_install_note_only_for_cli_agents() {
        assert!(Agent::GeminiCli.post_install_note().is_some());
        assert!(Agent::QwenCode.post_install_note().is_some());
        assert!(Agent::ClaudeCode.post_install_note().is_none());
    }
}
