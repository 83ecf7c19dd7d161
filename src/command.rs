// src/command.rs

//! Command-line assembly for the publisher.
//!
//! The publisher parses its arguments positionally:
//!
//! ```text
//! <executable> [<config file>] <BUILD_URL><report> <BUILD_URL><artifacts> [<host>]
//! ```
//!
//! URL parts are joined by plain string concatenation. No `/` is inserted,
//! so the configured fragments (or `BUILD_URL`) carry the separator.

use crate::env::Environment;
use crate::resolve::ResolvedPaths;

pub const HOST_VAR: &str = "host";
pub const BUILD_URL_VAR: &str = "BUILD_URL";

/// Relative URL fragments appended to `BUILD_URL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlFragments {
    pub report_url: String,
    pub artifacts_url: String,
}

impl UrlFragments {
    pub fn new(report_url: impl Into<String>, artifacts_url: impl Into<String>) -> Self {
        Self {
            report_url: report_url.into(),
            artifacts_url: artifacts_url.into(),
        }
    }
}

/// Argument vector plus the warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// `args[0]` is the executable.
    pub args: Vec<String>,
    pub warnings: Vec<String>,
}

impl CommandLine {
    pub fn program(&self) -> &str {
        &self.args[0]
    }

    pub fn arguments(&self) -> &[String] {
        &self.args[1..]
    }
}

/// Build the publisher's argument vector. Never fails.
///
/// A config file is included whenever one is configured, even if it is the
/// empty string. `host` is appended only when the environment defines it;
/// otherwise a warning is recorded.
pub fn build_command(
    paths: &ResolvedPaths,
    fragments: &UrlFragments,
    env: &Environment,
) -> CommandLine {
    let build_url = env.get(BUILD_URL_VAR).map(String::as_str).unwrap_or("");

    let mut args = Vec::with_capacity(5);
    let mut warnings = Vec::new();

    args.push(paths.executable.clone());
    if let Some(ref config_file) = paths.config_file {
        args.push(config_file.clone());
    }
    args.push(format!("{build_url}{}", fragments.report_url));
    args.push(format!("{build_url}{}", fragments.artifacts_url));

    match env.get(HOST_VAR) {
        Some(host) => args.push(host.clone()),
        None => warnings.push(format!(
            "environment variable '{HOST_VAR}' is not set; publisher will run without a target host"
        )),
    }

    CommandLine { args, warnings }
}
