// src/config/validate.rs

use std::collections::HashSet;
use std::fmt;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PublisherError, Result};

/// Values shorter than this (in characters) are flagged as suspicious.
pub const MIN_FIELD_LEN: usize = 4;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PublisherError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.installations,
            raw.nodes,
            raw.step,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_installation_names(cfg)?;
    validate_node_names(cfg)?;
    Ok(())
}

fn validate_installation_names(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for (idx, inst) in cfg.installations.iter().enumerate() {
        if inst.name.is_empty() {
            return Err(PublisherError::Config(format!(
                "[[installation]] #{} has an empty name",
                idx + 1
            )));
        }
        if !seen.insert(inst.name.as_str()) {
            return Err(PublisherError::Config(format!(
                "duplicate installation name '{}'",
                inst.name
            )));
        }
    }
    Ok(())
}

fn validate_node_names(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for (idx, node) in cfg.nodes.iter().enumerate() {
        if node.name.is_empty() {
            return Err(PublisherError::Config(format!(
                "[[node]] #{} has an empty name",
                idx + 1
            )));
        }
        if !seen.insert(node.name.as_str()) {
            return Err(PublisherError::Config(format!(
                "duplicate node name '{}'",
                node.name
            )));
        }
    }
    Ok(())
}

/// Result of checking a single user-entered string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidation {
    Ok,
    Warning(String),
    Error(String),
}

impl FieldValidation {
    pub fn is_ok(&self) -> bool {
        matches!(self, FieldValidation::Ok)
    }
}

impl fmt::Display for FieldValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValidation::Ok => write!(f, "ok"),
            FieldValidation::Warning(msg) => write!(f, "warning: {msg}"),
            FieldValidation::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Length-based check applied to names, paths and URL fragments.
///
/// Empty is an error, fewer than [`MIN_FIELD_LEN`] characters is a warning.
pub fn validate_field(value: &str) -> FieldValidation {
    let len = value.chars().count();
    if len == 0 {
        FieldValidation::Error("value is empty".to_string())
    } else if len < MIN_FIELD_LEN {
        FieldValidation::Warning("value is too short".to_string())
    } else {
        FieldValidation::Ok
    }
}

/// A non-ok finding for one configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiagnostic {
    /// Dotted location, e.g. `installation.pub.home` or `step.report_url`.
    pub field: String,
    pub validation: FieldValidation,
}

/// Run [`validate_field`] over every user-entered field and return the
/// findings that are not ok.
///
/// Findings are advisory. Empty values stay loadable and reach the core as
/// empty path or URL components.
pub fn field_diagnostics(cfg: &ConfigFile) -> Vec<FieldDiagnostic> {
    let mut out = Vec::new();
    let mut check = |field: String, value: &str| {
        let validation = validate_field(value);
        if !validation.is_ok() {
            out.push(FieldDiagnostic { field, validation });
        }
    };

    for inst in cfg.installations() {
        check(format!("installation.{}.home", inst.name), &inst.home);
        if let Some(ref config_home) = inst.config_home {
            check(format!("installation.{}.config_home", inst.name), config_home);
        }
    }

    if let Some(step) = cfg.step() {
        let fields = [
            ("step.installation", &step.installation),
            ("step.report_url", &step.report_url),
            ("step.artifacts_url", &step.artifacts_url),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                check(field.to_string(), value);
            }
        }
    }

    out
}
