use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use publisher_runner::errors::LaunchError;
use publisher_runner::exec::{LaunchFuture, LaunchSpec, ProcessLauncher};
use publisher_runner::joblog::JobLog;

/// What the fake should do when asked to launch.
#[derive(Debug, Clone)]
pub enum FakeBehaviour {
    /// Write these lines to the job log, then "exit" with the code.
    Exit { code: i32, output: Vec<String> },
    /// Fail as if the executable could not be started.
    SpawnFails,
    /// Wait for cancellation, then report an interruption.
    BlockUntilCancelled,
}

/// A fake launcher that:
/// - records every `LaunchSpec` it receives
/// - never spawns a process, replaying `FakeBehaviour` instead.
#[derive(Clone)]
pub struct FakeLauncher {
    behaviour: FakeBehaviour,
    launched: Arc<Mutex<Vec<LaunchSpec>>>,
}

impl FakeLauncher {
    pub fn new(behaviour: FakeBehaviour) -> Self {
        Self {
            behaviour,
            launched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn exiting_with(code: i32) -> Self {
        Self::new(FakeBehaviour::Exit {
            code,
            output: Vec::new(),
        })
    }

    pub fn launched(&self) -> Vec<LaunchSpec> {
        self.launched.lock().unwrap().clone()
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(
        &self,
        spec: LaunchSpec,
        log: Arc<dyn JobLog>,
        cancel: CancellationToken,
    ) -> LaunchFuture<'_> {
        let program = spec.args.first().cloned().unwrap_or_default();
        self.launched.lock().unwrap().push(spec);
        let behaviour = self.behaviour.clone();

        Box::pin(async move {
            match behaviour {
                FakeBehaviour::Exit { code, output } => {
                    for line in output {
                        log.line(&line);
                    }
                    Ok(code)
                }
                FakeBehaviour::SpawnFails => Err(LaunchError::Spawn {
                    program,
                    source: std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "permission denied",
                    ),
                }),
                FakeBehaviour::BlockUntilCancelled => {
                    cancel.cancelled().await;
                    Err(LaunchError::Interrupted { program })
                }
            }
        })
    }
}
