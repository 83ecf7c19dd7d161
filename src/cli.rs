// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::default_config_path;

/// Command-line arguments for `publisher-runner`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "publisher-runner",
    version,
    about = "Run a configured publisher executable with the build's report and artifact URLs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Installation to run. Overrides `[step].installation`.
    #[arg(long, value_name = "NAME")]
    pub installation: Option<String>,

    /// Report URL fragment appended to BUILD_URL. Overrides `[step].report_url`.
    #[arg(long, value_name = "FRAGMENT")]
    pub report_url: Option<String>,

    /// Artifacts URL fragment appended to BUILD_URL. Overrides
    /// `[step].artifacts_url`.
    #[arg(long, value_name = "FRAGMENT")]
    pub artifacts_url: Option<String>,

    /// Execution node (`built-in` or a `[[node]]` name).
    #[arg(long, value_name = "NAME")]
    pub node: Option<String>,

    /// Working directory of the publisher process. Default: current directory.
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<String>,

    /// Extra job environment entry; repeatable, later entries win.
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PUBLISHER_RUNNER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the command line, but don't launch anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
