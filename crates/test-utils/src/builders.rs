#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use publisher_runner::command::UrlFragments;
use publisher_runner::config::{
    ConfigFile, NodeConfig, PublisherInstallation, RawConfigFile, StepConfig,
};
use publisher_runner::env::Environment;
use publisher_runner::publish::InvocationRequest;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_installation(mut self, installation: PublisherInstallation) -> Self {
        self.config.installations.push(installation);
        self
    }

    pub fn with_node(mut self, name: &str, tool_locations: &[(&str, &str)]) -> Self {
        self.config.nodes.push(NodeConfig {
            name: name.to_string(),
            tool_locations: tool_locations
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self
    }

    pub fn with_step(mut self, installation: &str, report_url: &str, artifacts_url: &str) -> Self {
        self.config.step = Some(StepConfig {
            installation: Some(installation.to_string()),
            report_url: Some(report_url.to_string()),
            artifacts_url: Some(artifacts_url.to_string()),
        });
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment literal: `env(&[("host", "wiki.local")])`.
pub fn env(pairs: &[(&str, &str)]) -> Environment {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<BTreeMap<_, _>>()
}

/// Builder for `InvocationRequest`.
pub struct RequestBuilder {
    request: InvocationRequest,
}

impl RequestBuilder {
    pub fn new(installation: &str) -> Self {
        Self {
            request: InvocationRequest {
                installation: installation.to_string(),
                fragments: UrlFragments::default(),
                env: Environment::new(),
                working_dir: PathBuf::from("."),
            },
        }
    }

    pub fn fragments(mut self, report_url: &str, artifacts_url: &str) -> Self {
        self.request.fragments = UrlFragments::new(report_url, artifacts_url);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.request.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.request.working_dir = dir.into();
        self
    }

    pub fn build(self) -> InvocationRequest {
        self.request
    }
}
