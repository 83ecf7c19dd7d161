// src/publish.rs

//! The publish step.
//!
//! One invocation runs strictly in order and stops at the first hard
//! failure:
//!
//! 1. lookup the installation by name in the registry
//! 2. specialize it for the node and the job environment
//! 3. verify the executable exists on the node
//! 4. build the argument vector
//! 5. launch the publisher and wait for it
//! 6. report the exit code
//!
//! Failures in steps 1-3 are fatal: they are written to the job log with
//! [`JobLog::fatal_error`] and returned as `Err`, and nothing is spawned.
//! Failures in step 5 are only logged and come back as
//! [`InvocationOutcome::LaunchFailed`], leaving the job status to the
//! caller. Exit codes are reported as-is, never mapped to success/failure.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::command::{build_command, CommandLine, UrlFragments};
use crate::env::Environment;
use crate::errors::{LaunchFailureKind, PublisherError, Result};
use crate::exec::{LaunchSpec, ProcessLauncher};
use crate::joblog::JobLog;
use crate::node::ExecutionNode;
use crate::registry::InstallationRegistry;
use crate::resolve::{specialize, verify_executable, ResolvedPaths};

/// Input of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    /// Name of the installation to run.
    pub installation: String,
    pub fragments: UrlFragments,
    pub env: Environment,
    pub working_dir: PathBuf,
}

/// How an invocation that got as far as launching ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Exited { code: i32 },
    LaunchFailed {
        kind: LaunchFailureKind,
        message: String,
    },
}

pub struct PublishStep {
    registry: Arc<InstallationRegistry>,
    launcher: Arc<dyn ProcessLauncher>,
}

impl PublishStep {
    pub fn new(registry: Arc<InstallationRegistry>, launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self { registry, launcher }
    }

    /// Run the whole invocation.
    pub async fn perform(
        &self,
        request: InvocationRequest,
        node: &dyn ExecutionNode,
        log: Arc<dyn JobLog>,
        cancel: CancellationToken,
    ) -> Result<InvocationOutcome> {
        log_environment(log.as_ref(), &request.env);

        let command = self.prepare(&request, node, log.as_ref())?;

        let spec = LaunchSpec {
            args: command.args,
            env: request.env,
            working_dir: request.working_dir,
        };

        match self.launcher.launch(spec, Arc::clone(&log), cancel).await {
            Ok(code) => {
                info!(installation = %request.installation, exit_code = code, "publisher finished");
                log.line(&format!("Publisher exit code is: {code}"));
                Ok(InvocationOutcome::Exited { code })
            }
            Err(e) => {
                let kind = e.kind();
                let message = e.to_string();
                warn!(installation = %request.installation, ?kind, error = %message, "publisher launch failed");
                log.line(&format!("Publisher launch failed: {message}"));
                Ok(InvocationOutcome::LaunchFailed { kind, message })
            }
        }
    }

    /// Steps 1-4: everything up to, but not including, the launch.
    ///
    /// Also used for dry runs. Fatal errors are written to `log` before being
    /// returned; warnings from the command builder are written as warnings.
    pub fn prepare(
        &self,
        request: &InvocationRequest,
        node: &dyn ExecutionNode,
        log: &dyn JobLog,
    ) -> Result<CommandLine> {
        let installation = self
            .registry
            .find(&request.installation)
            .ok_or_else(|| PublisherError::InstallationNotFound(request.installation.clone()))
            .map_err(|e| fatal(log, e))?;

        let specialized = specialize(&installation, node, &request.env)
            .map_err(|e| match e {
                e @ PublisherError::PathResolution { .. } => e,
                other => PublisherError::PathResolution {
                    installation: installation.name.clone(),
                    reason: other.to_string(),
                },
            })
            .map_err(|e| fatal(log, e))?;

        verify_executable(node, &specialized.home).map_err(|e| fatal(log, e))?;

        let paths = ResolvedPaths::from(specialized);
        let command = build_command(&paths, &request.fragments, &request.env);
        for warning in &command.warnings {
            warn!(installation = %request.installation, "{warning}");
            log.warning(warning);
        }

        info!(
            installation = %request.installation,
            node = %node.name(),
            args = ?command.args,
            "publisher command prepared"
        );
        Ok(command)
    }
}

fn fatal(log: &dyn JobLog, err: PublisherError) -> PublisherError {
    error!(error = %err, "publish step aborted");
    log.fatal_error(&err.to_string());
    err
}

fn log_environment(log: &dyn JobLog, env: &Environment) {
    log.line("Environment variables:");
    for (key, value) in env {
        log.line(&format!("{key}={value}"));
    }
}
