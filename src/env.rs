// src/env.rs

//! Job environment helpers: `${NAME}` expansion and environment capture.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::errors::{PublisherError, Result};

/// Environment of one job run. Ordered so log dumps are deterministic.
pub type Environment = BTreeMap<String, String>;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.]*)\}").expect("placeholder regex is valid")
    })
}

/// Replace every `${NAME}` whose `NAME` is in `env` with its value.
///
/// Unknown names are left verbatim. Substituted values are not expanded
/// again.
pub fn expand(template: &str, env: &Environment) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| match env.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Snapshot of the current process environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn capture_process_env() -> Environment {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Parse a `KEY=VALUE` override. The value may itself contain `=`.
pub fn parse_override(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(PublisherError::Config(format!(
            "invalid environment override '{raw}' (expected KEY=VALUE)"
        ))),
    }
}

/// Apply `KEY=VALUE` overrides on top of `base`; later entries win.
pub fn with_overrides<I, S>(mut base: Environment, overrides: I) -> Result<Environment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for raw in overrides {
        let (key, value) = parse_override(raw.as_ref())?;
        base.insert(key, value);
    }
    Ok(base)
}
