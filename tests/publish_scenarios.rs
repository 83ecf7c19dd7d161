// tests/publish_scenarios.rs

mod common;
use crate::common::init_tracing;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use publisher_runner::config::PublisherInstallation;
use publisher_runner::errors::{LaunchFailureKind, PublisherError};
use publisher_runner::fs::mock::MockFileSystem;
use publisher_runner::joblog::{JobLog, MemoryLog};
use publisher_runner::node::LocalNode;
use publisher_runner::publish::{InvocationOutcome, PublishStep};
use publisher_runner::registry::InstallationRegistry;
use publisher_runner_test_utils::builders::RequestBuilder;
use publisher_runner_test_utils::fake_launcher::{FakeBehaviour, FakeLauncher};
use publisher_runner_test_utils::failing_node::FailingNode;
use publisher_runner_test_utils::with_timeout;

fn pub_installation() -> PublisherInstallation {
    PublisherInstallation::new("pub", "/opt/pub.sh").with_config_home("/opt/pub.conf")
}

fn node_with(paths: &[&str]) -> LocalNode {
    let fs = MockFileSystem::new();
    for p in paths {
        fs.add_file(p);
    }
    LocalNode::new("agent-1", Arc::new(fs))
}

fn step_with(launcher: &FakeLauncher, installations: Vec<PublisherInstallation>) -> PublishStep {
    PublishStep::new(
        Arc::new(InstallationRegistry::new(installations)),
        Arc::new(launcher.clone()),
    )
}

fn scenario_a_request() -> publisher_runner::publish::InvocationRequest {
    RequestBuilder::new("pub")
        .fragments("allure", "artifact/log")
        .env("host", "wiki.local")
        .env("BUILD_URL", "http://ci/42/")
        .build()
}

#[tokio::test]
async fn scenario_a_full_command_line() {
    init_tracing();
    let launcher = FakeLauncher::exiting_with(0);
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = node_with(&["/opt/pub.sh"]);
    let log = MemoryLog::new();

    let outcome = step
        .perform(scenario_a_request(), &node, Arc::new(log.clone()), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, InvocationOutcome::Exited { code: 0 });

    let launched = launcher.launched();
    assert_eq!(launched.len(), 1);
    assert_eq!(
        launched[0].args,
        vec![
            "/opt/pub.sh",
            "/opt/pub.conf",
            "http://ci/42/allure",
            "http://ci/42/artifact/log",
            "wiki.local",
        ]
    );
    assert_eq!(launched[0].env.get("host").map(String::as_str), Some("wiki.local"));
    assert!(log.warnings().is_empty());
    assert!(log.fatals().is_empty());
}

#[tokio::test]
async fn scenario_b_missing_host_warns_and_drops_argument() {
    init_tracing();
    let launcher = FakeLauncher::exiting_with(0);
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = node_with(&["/opt/pub.sh"]);
    let log = MemoryLog::new();

    let request = RequestBuilder::new("pub")
        .fragments("allure", "artifact/log")
        .env("BUILD_URL", "http://ci/42/")
        .build();

    step.perform(request, &node, Arc::new(log.clone()), CancellationToken::new())
        .await
        .unwrap();

    let launched = launcher.launched();
    assert_eq!(
        launched[0].args,
        vec![
            "/opt/pub.sh",
            "/opt/pub.conf",
            "http://ci/42/allure",
            "http://ci/42/artifact/log",
        ]
    );
    assert_eq!(log.warnings().len(), 1);
    assert!(log.warnings()[0].contains("host"));
}

#[tokio::test]
async fn scenario_c_unknown_installation_aborts_before_spawn() {
    init_tracing();
    let launcher = FakeLauncher::exiting_with(0);
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = node_with(&["/opt/pub.sh"]);
    let log = MemoryLog::new();

    let request = RequestBuilder::new("nope").fragments("allure", "artifact/log").build();
    let result = step
        .perform(request, &node, Arc::new(log.clone()), CancellationToken::new())
        .await;

    match result {
        Err(PublisherError::InstallationNotFound(name)) => assert_eq!(name, "nope"),
        other => panic!("expected InstallationNotFound, got {:?}", other),
    }
    assert!(launcher.launched().is_empty());
    let fatals = log.fatals();
    assert_eq!(fatals.len(), 1);
    assert!(fatals[0].contains("not found"));
}

#[tokio::test]
async fn scenario_d_missing_executable_aborts_before_spawn() {
    init_tracing();
    let launcher = FakeLauncher::exiting_with(0);
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = node_with(&[]);
    let log = MemoryLog::new();

    let result = step
        .perform(scenario_a_request(), &node, Arc::new(log.clone()), CancellationToken::new())
        .await;

    match result {
        Err(PublisherError::ExecutableMissing { path, .. }) => assert_eq!(path, "/opt/pub.sh"),
        other => panic!("expected ExecutableMissing, got {:?}", other),
    }
    assert!(launcher.launched().is_empty());
    assert_eq!(log.fatals().len(), 1);
    assert!(log.fatals()[0].contains("/opt/pub.sh"));
}

#[tokio::test]
async fn probe_failure_counts_as_missing_executable() {
    let launcher = FakeLauncher::exiting_with(0);
    let step = step_with(&launcher, vec![pub_installation()]);
    let fs = MockFileSystem::new();
    fs.add_file("/opt/pub.sh");
    fs.fail_probes(Some(std::io::ErrorKind::TimedOut));
    let node = LocalNode::new("agent-1", Arc::new(fs));
    let log = MemoryLog::new();

    let result = step
        .perform(scenario_a_request(), &node, Arc::new(log.clone()), CancellationToken::new())
        .await;

    assert!(matches!(result, Err(PublisherError::ExecutableMissing { .. })));
    assert!(launcher.launched().is_empty());
    assert!(log.fatals()[0].contains("could not check"));
}

#[tokio::test]
async fn node_translation_failure_is_path_resolution_error() {
    let launcher = FakeLauncher::exiting_with(0);
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = FailingNode::new("offline-agent");
    let log = MemoryLog::new();

    let result = step
        .perform(scenario_a_request(), &node, Arc::new(log.clone()), CancellationToken::new())
        .await;

    match result {
        Err(PublisherError::PathResolution { installation, reason }) => {
            assert_eq!(installation, "pub");
            assert!(reason.contains("offline-agent"));
        }
        other => panic!("expected PathResolution, got {:?}", other),
    }
    assert!(launcher.launched().is_empty());
    assert_eq!(log.fatals().len(), 1);
}

#[tokio::test]
async fn spawn_failure_is_logged_not_propagated() {
    let launcher = FakeLauncher::new(FakeBehaviour::SpawnFails);
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = node_with(&["/opt/pub.sh"]);
    let log = MemoryLog::new();

    let outcome = step
        .perform(scenario_a_request(), &node, Arc::new(log.clone()), CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        InvocationOutcome::LaunchFailed { kind, message } => {
            assert_eq!(kind, LaunchFailureKind::Spawn);
            assert!(message.contains("/opt/pub.sh"));
        }
        other => panic!("expected LaunchFailed, got {:?}", other),
    }
    assert!(log.fatals().is_empty());
    assert!(log.lines().iter().any(|l| l.starts_with("Publisher launch failed")));
}

#[tokio::test]
async fn cancellation_while_waiting_reports_interrupted() {
    let launcher = FakeLauncher::new(FakeBehaviour::BlockUntilCancelled);
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = node_with(&["/opt/pub.sh"]);
    let log = MemoryLog::new();
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            cancel.cancel();
        })
    };

    let outcome = with_timeout(step.perform(
        scenario_a_request(),
        &node,
        Arc::new(log.clone()),
        cancel,
    ))
    .await
    .unwrap();
    canceller.await.unwrap();

    assert!(matches!(
        outcome,
        InvocationOutcome::LaunchFailed {
            kind: LaunchFailureKind::Interrupted,
            ..
        }
    ));
}

#[tokio::test]
async fn exit_code_is_reported_verbatim_and_output_forwarded() {
    let launcher = FakeLauncher::new(FakeBehaviour::Exit {
        code: 7,
        output: vec!["page updated".to_string()],
    });
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = node_with(&["/opt/pub.sh"]);
    let log = MemoryLog::new();

    let outcome = step
        .perform(scenario_a_request(), &node, Arc::new(log.clone()), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, InvocationOutcome::Exited { code: 7 });
    let lines = log.lines();
    assert!(lines.contains(&"page updated".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("Publisher exit code is: 7"));
}

#[tokio::test]
async fn environment_is_dumped_before_anything_else() {
    let launcher = FakeLauncher::exiting_with(0);
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = node_with(&["/opt/pub.sh"]);
    let log = MemoryLog::new();

    step.perform(scenario_a_request(), &node, Arc::new(log.clone()), CancellationToken::new())
        .await
        .unwrap();

    let lines = log.lines();
    assert_eq!(lines[0], "Environment variables:");
    assert_eq!(lines[1], "BUILD_URL=http://ci/42/");
    assert_eq!(lines[2], "host=wiki.local");
}

#[tokio::test]
async fn first_matching_installation_wins_and_templates_expand() {
    let launcher = FakeLauncher::exiting_with(0);
    let installations = vec![
        PublisherInstallation::new("other", "/opt/other.sh"),
        PublisherInstallation::new("pub", "${TOOLS}/pub.sh").with_config_home("${CONF}/pub.conf"),
    ];
    let registry = Arc::new(InstallationRegistry::new(installations.clone()));
    let step = PublishStep::new(Arc::clone(&registry), Arc::new(launcher.clone()));
    let node = node_with(&["/tools/pub.sh"]);
    let log = MemoryLog::new();

    let request = RequestBuilder::new("pub")
        .fragments("allure", "log")
        .env("TOOLS", "/tools")
        .env("host", "h")
        .build();

    step.perform(request, &node, Arc::new(log.clone()), CancellationToken::new())
        .await
        .unwrap();

    // ${CONF} is not in the environment and stays as-is.
    assert_eq!(
        launcher.launched()[0].args,
        vec!["/tools/pub.sh", "${CONF}/pub.conf", "allure", "log", "h"]
    );
    // The registry still holds the unexpanded templates.
    assert_eq!(&*registry.installations(), installations.as_slice());
}

#[tokio::test]
async fn node_tool_location_overrides_home() {
    let launcher = FakeLauncher::exiting_with(0);
    let step = step_with(&launcher, vec![pub_installation()]);
    let node = node_with(&["/mnt/agent/pub.sh"]).with_tool_location("pub", "/mnt/${AGENT}/pub.sh");
    let log: Arc<dyn JobLog> = Arc::new(MemoryLog::new());

    let request = RequestBuilder::new("pub")
        .fragments("a", "b")
        .env("AGENT", "agent")
        .env("host", "h")
        .build();

    step.perform(request, &node, log, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(launcher.launched()[0].args[0], "/mnt/agent/pub.sh");
}
