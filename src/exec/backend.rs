// src/exec/backend.rs

//! Pluggable process launcher abstraction.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::env::Environment;
use crate::errors::LaunchError;
use crate::joblog::JobLog;

use super::process_runner::run_process;

/// Everything needed to start the publisher process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    /// `argv`, executable first.
    pub args: Vec<String>,
    /// Complete environment of the child; nothing is inherited.
    pub env: Environment,
    pub working_dir: PathBuf,
}

/// Resolves to the child's exit code once it has exited and its output has
/// been drained.
pub type LaunchFuture<'a> = Pin<Box<dyn Future<Output = Result<i32, LaunchError>> + Send + 'a>>;

/// Trait abstracting how the publisher process is started.
///
/// Production code uses [`RealProcessLauncher`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ProcessLauncher: Send + Sync {
    fn launch(
        &self,
        spec: LaunchSpec,
        log: Arc<dyn JobLog>,
        cancel: CancellationToken,
    ) -> LaunchFuture<'_>;
}

/// Launcher backed by OS processes.
#[derive(Debug, Clone, Default)]
pub struct RealProcessLauncher;

impl ProcessLauncher for RealProcessLauncher {
    fn launch(
        &self,
        spec: LaunchSpec,
        log: Arc<dyn JobLog>,
        cancel: CancellationToken,
    ) -> LaunchFuture<'_> {
        Box::pin(run_process(spec, log, cancel))
    }
}
