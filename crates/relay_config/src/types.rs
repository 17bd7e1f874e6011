//! Configuration data types for `relay.toml`.

use serde::{Deserialize, Serialize};

/// The complete flow configuration parsed from `relay.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Project metadata.
    pub project: ProjectSection,
    /// Synthesis flow switches.
    #[serde(default)]
    pub synth: SynthSection,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            project: ProjectSection {
                name: "untitled".to_string(),
            },
            synth: SynthSection::default(),
        }
    }
}

/// The `[project]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Project name, used for display only.
    pub name: String,
}

/// The `[synth]` section controlling the synthesis flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthSection {
    /// Whether the peephole optimizer runs to fixpoint. When `false`, only
    /// clock synchronization is applied.
    #[serde(default = "default_true")]
    pub optimize: bool,
    /// Whether clock domains are re-balanced after optimization.
    #[serde(default = "default_true")]
    pub sync_clocks: bool,
}

impl Default for SynthSection {
    fn default() -> Self {
        Self {
            optimize: true,
            sync_clocks: true,
        }
    }
}

fn default_true() -> bool {
    true
}
