// src/exec/process_runner.rs

//! Single publisher process runner.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::LaunchError;
use crate::joblog::JobLog;

use super::backend::LaunchSpec;

/// Longest chunk of child output forwarded as a single log line.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Run the process described by `spec` to completion.
///
/// - stdout and stderr are forwarded line by line into `log` while the child
///   runs; the call returns only after both streams hit EOF.
/// - If `cancel` fires while the child runs, the child is killed and reaped
///   and [`LaunchError::Interrupted`] is returned. Cancelling while output is
///   still being drained after the child exited also returns `Interrupted`.
pub async fn run_process(
    spec: LaunchSpec,
    log: Arc<dyn JobLog>,
    cancel: CancellationToken,
) -> Result<i32, LaunchError> {
    let Some((program, args)) = spec.args.split_first() else {
        return Err(LaunchError::Spawn {
            program: String::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty argument vector"),
        });
    };

    info!(
        program = %program,
        args = ?args,
        cwd = ?spec.working_dir,
        "starting publisher process"
    );

    let mut cmd = Command::new(program);
    cmd.args(args)
        .env_clear()
        .envs(&spec.env)
        .current_dir(&spec.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        program: program.clone(),
        source,
    })?;

    debug!(pid = ?child.id(), "publisher process started");

    let mut pumps: Vec<JoinHandle<()>> = [
        child.stdout.take().map(|out| spawn_pump(out, Arc::clone(&log))),
        child.stderr.take().map(|err| spawn_pump(err, Arc::clone(&log))),
    ]
    .into_iter()
    .flatten()
    .collect();

    let status = tokio::select! {
        status_res = child.wait() => {
            status_res.map_err(|source| LaunchError::Wait {
                program: program.clone(),
                source,
            })?
        }

        _ = cancel.cancelled() => {
            info!(program = %program, "cancellation requested; killing publisher process");
            if let Err(e) = child.kill().await {
                warn!(program = %program, error = %e, "failed to kill publisher process");
            }
            abort_pumps(&pumps);
            return Err(LaunchError::Interrupted {
                program: program.clone(),
            });
        }
    };

    // Background processes left behind by the publisher can hold the pipes
    // open after it exits; cancellation must still get through.
    tokio::select! {
        _ = drain_pumps(&mut pumps) => {}

        _ = cancel.cancelled() => {
            info!(program = %program, "cancellation requested while draining publisher output");
            abort_pumps(&pumps);
            return Err(LaunchError::Interrupted {
                program: program.clone(),
            });
        }
    }

    let code = exit_code(status);
    info!(program = %program, exit_code = code, "publisher process exited");
    Ok(code)
}

async fn drain_pumps(pumps: &mut [JoinHandle<()>]) {
    for pump in pumps.iter_mut() {
        if let Err(e) = pump.await {
            warn!(error = %e, "output pump task failed");
        }
    }
}

fn abort_pumps(pumps: &[JoinHandle<()>]) {
    for pump in pumps {
        pump.abort();
    }
}

/// Forward `stream` to `log` one line at a time. Lines longer than
/// [`MAX_LINE_BYTES`] are split into several log lines.
fn spawn_pump<R>(stream: R, log: Arc<dyn JobLog>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::with_capacity(1024);
        loop {
            buf.clear();
            let mut limited = (&mut reader).take(MAX_LINE_BYTES as u64);
            match limited.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buf);
                    log.line(text.trim_end_matches(['\n', '\r']));
                }
                Err(e) => {
                    debug!(error = %e, "stopped reading publisher output");
                    break;
                }
            }
        }
    })
}

/// Raw exit code; on Unix a signal death maps to `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
