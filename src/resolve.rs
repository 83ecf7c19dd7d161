// src/resolve.rs

//! Path resolution: turn a configured installation into concrete paths for
//! one node and one job environment.

use std::path::Path;

use tracing::debug;

use crate::config::PublisherInstallation;
use crate::env::{expand, Environment};
use crate::errors::{PublisherError, Result};
use crate::node::ExecutionNode;

/// Concrete paths for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub executable: String,
    pub config_file: Option<String>,
}

impl From<PublisherInstallation> for ResolvedPaths {
    fn from(inst: PublisherInstallation) -> Self {
        Self {
            executable: inst.home,
            config_file: inst.config_home,
        }
    }
}

/// Produce a node- and environment-specialized copy of `installation`.
///
/// Node translation runs first, then `${VAR}` expansion of `home` and
/// `config_home`. The input is left untouched.
pub fn specialize(
    installation: &PublisherInstallation,
    node: &dyn ExecutionNode,
    env: &Environment,
) -> Result<PublisherInstallation> {
    let translated = node.translate_home(installation)?;
    let home = expand(&translated, env);
    let config_home = installation.config_home.as_deref().map(|c| expand(c, env));

    debug!(
        installation = %installation.name,
        node = %node.name(),
        home = %home,
        config_home = ?config_home,
        "specialized installation"
    );

    Ok(PublisherInstallation {
        name: installation.name.clone(),
        home,
        config_home,
    })
}

/// Check that `executable` exists on `node`.
///
/// A probe that cannot complete counts as missing.
pub fn verify_executable(node: &dyn ExecutionNode, executable: &str) -> Result<()> {
    match node.exists(Path::new(executable)) {
        Ok(true) => Ok(()),
        Ok(false) => Err(PublisherError::ExecutableMissing {
            path: executable.to_string(),
            reason: format!("not found on node '{}'", node.name()),
        }),
        Err(e) => Err(PublisherError::ExecutableMissing {
            path: executable.to_string(),
            reason: format!("could not check on node '{}': {e}", node.name()),
        }),
    }
}

/// [`specialize`] followed by [`verify_executable`].
pub fn resolve(
    installation: &PublisherInstallation,
    node: &dyn ExecutionNode,
    env: &Environment,
) -> Result<ResolvedPaths> {
    let specialized = specialize(installation, node, env)?;
    verify_executable(node, &specialized.home)?;
    Ok(specialized.into())
}
