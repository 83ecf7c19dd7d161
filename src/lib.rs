// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod env;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod joblog;
pub mod logging;
pub mod node;
pub mod publish;
pub mod registry;
pub mod resolve;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::command::UrlFragments;
use crate::config::loader::load_and_validate;
use crate::config::{field_diagnostics, ConfigFile};
use crate::env::{capture_process_env, with_overrides, Environment};
use crate::errors::PublisherError;
use crate::exec::RealProcessLauncher;
use crate::joblog::{ConsoleLog, JobLog};
use crate::node::{select_node, ExecutionNode};
use crate::publish::{InvocationOutcome, InvocationRequest, PublishStep};
use crate::registry::InstallationRegistry;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the installation registry
/// - node selection and the job environment
/// - the publish step with the real process launcher
/// - Ctrl-C handling (cancels and kills the publisher)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone();
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {:?}", config_path))?;

    let registry = Arc::new(InstallationRegistry::from_config(&cfg));
    let node = select_node(&cfg, args.node.as_deref())?;
    let env = with_overrides(capture_process_env(), &args.env)?;
    let request = build_request(&args, &cfg, env)?;

    let step = PublishStep::new(registry, Arc::new(RealProcessLauncher));
    let log: Arc<dyn JobLog> = Arc::new(ConsoleLog);

    if args.dry_run {
        print_dry_run(&cfg, &step, &request, &node, log.as_ref())?;
        return Ok(());
    }

    // Ctrl-C -> cancel the running publisher.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            cancel.cancel();
        });
    }

    match step.perform(request, &node, log, cancel).await? {
        InvocationOutcome::Exited { code } => info!(exit_code = code, "publish step complete"),
        InvocationOutcome::LaunchFailed { kind, .. } => {
            info!(?kind, "publish step complete without a publisher exit code")
        }
    }
    Ok(())
}

/// Merge CLI flags with the `[step]` section into an invocation request.
///
/// CLI flags win. A missing installation name is an error; missing URL
/// fragments become empty strings.
pub fn build_request(
    args: &CliArgs,
    cfg: &ConfigFile,
    env: Environment,
) -> std::result::Result<InvocationRequest, PublisherError> {
    let step = cfg.step().cloned().unwrap_or_default();

    let installation = args
        .installation
        .clone()
        .or(step.installation)
        .ok_or_else(|| {
            PublisherError::Config(
                "no installation selected (use --installation or [step].installation)".to_string(),
            )
        })?;

    let fragments = UrlFragments::new(
        args.report_url.clone().or(step.report_url).unwrap_or_default(),
        args.artifacts_url
            .clone()
            .or(step.artifacts_url)
            .unwrap_or_default(),
    );

    let working_dir = match args.workdir {
        Some(ref dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    Ok(InvocationRequest {
        installation,
        fragments,
        env,
        working_dir,
    })
}

/// Dry-run output: field findings and the command that would be launched.
fn print_dry_run(
    cfg: &ConfigFile,
    step: &PublishStep,
    request: &InvocationRequest,
    node: &dyn ExecutionNode,
    log: &dyn JobLog,
) -> Result<()> {
    println!("publisher-runner dry-run");
    println!("  installations: {}", cfg.installations().len());
    println!("  node: {}", node.name());
    println!("  working dir: {}", request.working_dir.display());

    let diagnostics = field_diagnostics(cfg);
    if !diagnostics.is_empty() {
        println!();
        println!("field checks:");
        for diag in &diagnostics {
            println!("  - {}: {}", diag.field, diag.validation);
        }
    }

    let command = step.prepare(request, node, log)?;
    println!();
    println!("command:");
    for (idx, arg) in command.args.iter().enumerate() {
        println!("  [{idx}] {arg}");
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
