// src/config/mod.rs

//! Configuration loading and validation for publisher-runner.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate structural invariants and run the advisory field checks
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, NodeConfig, PublisherInstallation, RawConfigFile, StepConfig};
pub use validate::{field_diagnostics, validate_field, FieldDiagnostic, FieldValidation};
