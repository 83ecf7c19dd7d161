// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ProcessLauncher` trait the publish step talks
//!   to, and the `RealProcessLauncher` used in production. Tests replace it
//!   with a fake that records launches instead of spawning processes.
//! - [`process_runner`] spawns one child with `tokio::process::Command`,
//!   streams its stdout/stderr into the job log and waits for it, killing
//!   the child if the invocation is cancelled.

pub mod backend;
pub mod process_runner;

pub use backend::{LaunchFuture, LaunchSpec, ProcessLauncher, RealProcessLauncher};
pub use process_runner::run_process;
