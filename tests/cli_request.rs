// tests/cli_request.rs

use clap::Parser;

use publisher_runner::build_request;
use publisher_runner::cli::CliArgs;
use publisher_runner::config::loader::default_config_path;
use publisher_runner::config::PublisherInstallation;
use publisher_runner::errors::PublisherError;
use publisher_runner_test_utils::builders::{env, ConfigFileBuilder};

#[test]
fn step_section_supplies_defaults() {
    let cfg = ConfigFileBuilder::new()
        .with_installation(PublisherInstallation::new("pub", "/opt/pub.sh"))
        .with_step("pub", "allure", "artifact/log")
        .build();
    let args = CliArgs::parse_from(["publisher-runner", "--workdir", "/work"]);

    let request = build_request(&args, &cfg, env(&[("host", "h")])).unwrap();

    assert_eq!(request.installation, "pub");
    assert_eq!(request.fragments.report_url, "allure");
    assert_eq!(request.fragments.artifacts_url, "artifact/log");
    assert_eq!(request.working_dir, std::path::PathBuf::from("/work"));
    assert_eq!(request.env.get("host").map(String::as_str), Some("h"));
}

#[test]
fn cli_flags_override_step_section() {
    let cfg = ConfigFileBuilder::new()
        .with_step("pub", "allure", "artifact/log")
        .build();
    let args = CliArgs::parse_from([
        "publisher-runner",
        "--installation",
        "other",
        "--report-url",
        "report",
        "--workdir",
        "/w",
    ]);

    let request = build_request(&args, &cfg, env(&[])).unwrap();

    assert_eq!(request.installation, "other");
    assert_eq!(request.fragments.report_url, "report");
    assert_eq!(request.fragments.artifacts_url, "artifact/log");
}

#[test]
fn missing_fragments_become_empty() {
    let cfg = ConfigFileBuilder::new().build();
    let args = CliArgs::parse_from(["publisher-runner", "--installation", "pub"]);

    let request = build_request(&args, &cfg, env(&[])).unwrap();

    assert_eq!(request.fragments.report_url, "");
    assert_eq!(request.fragments.artifacts_url, "");
    assert_eq!(request.working_dir, std::env::current_dir().unwrap());
}

#[test]
fn no_installation_anywhere_is_a_config_error() {
    let cfg = ConfigFileBuilder::new().build();
    let args = CliArgs::parse_from(["publisher-runner"]);

    assert!(matches!(
        build_request(&args, &cfg, env(&[])),
        Err(PublisherError::Config(_))
    ));
}

#[test]
fn repeated_env_flags_are_collected_in_order() {
    let args = CliArgs::parse_from([
        "publisher-runner",
        "--env",
        "host=a",
        "--env",
        "host=b",
        "--dry-run",
    ]);
    assert_eq!(args.env, vec!["host=a", "host=b"]);
    assert!(args.dry_run);
    assert_eq!(args.config, default_config_path());
}

#[test]
fn config_flag_overrides_default_path() {
    let args = CliArgs::parse_from(["publisher-runner", "--config", "ci/publish.toml"]);
    assert_eq!(args.config, std::path::PathBuf::from("ci/publish.toml"));
}
