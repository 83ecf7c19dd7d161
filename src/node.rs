// src/node.rs

//! Execution nodes.
//!
//! A node is the machine the publisher runs on. It decides where an
//! installation lives on that machine and answers existence probes for
//! paths on its filesystem.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::{ConfigFile, NodeConfig, PublisherInstallation};
use crate::errors::{PublisherError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Name of the node the runner itself executes on.
pub const BUILT_IN_NODE: &str = "built-in";

pub trait ExecutionNode: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Path of `installation`'s executable as seen from this node, before
    /// environment expansion.
    fn translate_home(&self, installation: &PublisherInstallation) -> Result<String>;

    /// Existence probe on this node's filesystem.
    fn exists(&self, path: &Path) -> io::Result<bool>;
}

/// Node backed by a [`FileSystem`] with optional per-installation path
/// overrides.
#[derive(Debug, Clone)]
pub struct LocalNode {
    name: String,
    tool_locations: BTreeMap<String, String>,
    fs: Arc<dyn FileSystem>,
}

impl LocalNode {
    pub fn new(name: impl Into<String>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            name: name.into(),
            tool_locations: BTreeMap::new(),
            fs,
        }
    }

    pub fn built_in() -> Self {
        Self::new(BUILT_IN_NODE, Arc::new(RealFileSystem))
    }

    pub fn from_config(cfg: &NodeConfig, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            name: cfg.name.clone(),
            tool_locations: cfg.tool_locations.clone(),
            fs,
        }
    }

    pub fn with_tool_location(
        mut self,
        installation: impl Into<String>,
        home: impl Into<String>,
    ) -> Self {
        self.tool_locations.insert(installation.into(), home.into());
        self
    }
}

impl ExecutionNode for LocalNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn translate_home(&self, installation: &PublisherInstallation) -> Result<String> {
        match self.tool_locations.get(&installation.name) {
            Some(home) => {
                debug!(
                    node = %self.name,
                    installation = %installation.name,
                    home = %home,
                    "using node-specific tool location"
                );
                Ok(home.clone())
            }
            None => Ok(installation.home.clone()),
        }
    }

    fn exists(&self, path: &Path) -> io::Result<bool> {
        self.fs.exists(path)
    }
}

/// Pick the node named `name`: the built-in node or one from `[[node]]`.
///
/// Configured nodes probe the local filesystem; the runner has no remote
/// transport of its own.
pub fn select_node(cfg: &ConfigFile, name: Option<&str>) -> Result<LocalNode> {
    match name {
        None | Some(BUILT_IN_NODE) => Ok(LocalNode::built_in()),
        Some(name) => match cfg.node(name) {
            Some(node_cfg) => Ok(LocalNode::from_config(node_cfg, Arc::new(RealFileSystem))),
            None => Err(PublisherError::Config(format!(
                "node '{name}' is not configured (known: {})",
                known_nodes(cfg)
            ))),
        },
    }
}

fn known_nodes(cfg: &ConfigFile) -> String {
    std::iter::once(BUILT_IN_NODE)
        .chain(cfg.nodes().iter().map(|n| n.name.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}
