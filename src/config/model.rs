// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [[installation]]
/// name = "pub"
/// home = "${TOOLS}/pub.sh"
/// config_home = "/opt/pub.conf"
///
/// [[node]]
/// name = "agent-1"
/// [node.tool_locations]
/// pub = "/mnt/tools/pub.sh"
///
/// [step]
/// installation = "pub"
/// report_url = "allure"
/// artifacts_url = "artifact/log"
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default, rename = "installation")]
    pub installations: Vec<PublisherInstallation>,

    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeConfig>,

    #[serde(default)]
    pub step: Option<StepConfig>,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`),
/// so installation and node names are known to be unique.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    installations: Vec<PublisherInstallation>,
    nodes: Vec<NodeConfig>,
    step: Option<StepConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        installations: Vec<PublisherInstallation>,
        nodes: Vec<NodeConfig>,
        step: Option<StepConfig>,
    ) -> Self {
        Self {
            installations,
            nodes,
            step,
        }
    }

    pub fn installations(&self) -> &[PublisherInstallation] {
        &self.installations
    }

    pub fn nodes(&self) -> &[NodeConfig] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&NodeConfig> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn step(&self) -> Option<&StepConfig> {
        self.step.as_ref()
    }
}

/// One configured external publisher executable.
///
/// `home` and `config_home` are templates: they may contain `${VAR}`
/// placeholders that are only resolved per invocation. The configured value
/// is never mutated; see [`crate::resolve::specialize`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublisherInstallation {
    pub name: String,

    #[serde(default)]
    pub home: String,

    #[serde(default)]
    pub config_home: Option<String>,
}

impl PublisherInstallation {
    pub fn new(name: impl Into<String>, home: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            home: home.into(),
            config_home: None,
        }
    }

    pub fn with_config_home(mut self, config_home: impl Into<String>) -> Self {
        self.config_home = Some(config_home.into());
        self
    }
}

/// `[[node]]` section: an execution node and its per-installation path
/// overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeConfig {
    pub name: String,

    /// Installation name -> executable path on this node.
    #[serde(default)]
    pub tool_locations: BTreeMap<String, String>,
}

/// `[step]` section: defaults for the publish step, each overridable on the
/// command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StepConfig {
    #[serde(default)]
    pub installation: Option<String>,

    #[serde(default)]
    pub report_url: Option<String>,

    #[serde(default)]
    pub artifacts_url: Option<String>,
}
