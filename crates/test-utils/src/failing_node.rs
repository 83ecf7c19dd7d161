use std::io;
use std::path::Path;

use publisher_runner::config::PublisherInstallation;
use publisher_runner::errors::{PublisherError, Result};
use publisher_runner::node::ExecutionNode;

/// A node that cannot be reached: translation always fails and probes
/// would report an I/O error.
#[derive(Debug, Clone)]
pub struct FailingNode {
    pub name: String,
}

impl FailingNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl ExecutionNode for FailingNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn translate_home(&self, installation: &PublisherInstallation) -> Result<String> {
        Err(PublisherError::NodeTranslation {
            installation: installation.name.clone(),
            node: self.name.clone(),
            reason: "node is offline".to_string(),
        })
    }

    fn exists(&self, _path: &Path) -> io::Result<bool> {
        Err(io::Error::new(io::ErrorKind::NotConnected, "node is offline"))
    }
}
