// src/errors.rs

//! Crate-wide error types.
//!
//! `PublisherError` covers everything that aborts an invocation before a
//! process is spawned, plus configuration loading. Failures that happen once
//! a launch has been attempted are reported through [`LaunchError`] inside
//! the invocation outcome instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublisherError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("publisher installation not found: '{0}'")]
    InstallationNotFound(String),

    #[error("could not translate installation '{installation}' for node '{node}': {reason}")]
    NodeTranslation {
        installation: String,
        node: String,
        reason: String,
    },

    #[error("path resolution failed for installation '{installation}': {reason}")]
    PathResolution { installation: String, reason: String },

    #[error("publisher executable missing: {path} ({reason})")]
    ExecutableMissing { path: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure of an attempted launch.
///
/// These never abort the publish step; the orchestrator logs them and
/// reports them as [`crate::publish::InvocationOutcome::LaunchFailed`].
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("interrupted while waiting for '{program}'; child process killed")]
    Interrupted { program: String },

    #[error("failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    pub fn kind(&self) -> LaunchFailureKind {
        match self {
            LaunchError::Spawn { .. } => LaunchFailureKind::Spawn,
            LaunchError::Interrupted { .. } => LaunchFailureKind::Interrupted,
            LaunchError::Wait { .. } => LaunchFailureKind::Wait,
        }
    }
}

/// Discriminant of [`LaunchError`] without the payload, cheap to compare in
/// callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchFailureKind {
    Spawn,
    Interrupted,
    Wait,
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PublisherError>;
