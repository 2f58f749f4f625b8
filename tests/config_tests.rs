//! Integration tests for runner configuration and profile files

use std::fs;

use debtune::config::{Profile, RunnerConfig, DEFAULT_COMMAND_TIMEOUT_SECS};
use debtune::error::DebtuneError;
use debtune::headless;
use debtune::tasks::TaskRegistry;

// =============================================================================
// RunnerConfig
// =============================================================================

#[test]
fn runner_config_survives_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debtune.json");

    let config = RunnerConfig {
        elevation_program: "sudo".to_string(),
        command_timeout_secs: 120,
        noninteractive: false,
        log_file: Some(dir.path().join("debtune.log")),
        ..RunnerConfig::default()
    };
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = RunnerConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn empty_object_is_the_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debtune.json");
    fs::write(&path, "{}").unwrap();

    let loaded = RunnerConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, RunnerConfig::default());
    assert_eq!(loaded.command_timeout_secs, DEFAULT_COMMAND_TIMEOUT_SECS);
}

#[test]
fn zero_timeout_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debtune.json");
    fs::write(&path, r#"{ "command_timeout_secs": 0 }"#).unwrap();

    let loaded = RunnerConfig::load_from_file(&path).unwrap();
    assert!(matches!(loaded.validate(), Err(DebtuneError::Config(_))));
}

#[test]
fn malformed_config_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    let err = RunnerConfig::load_from_file(&missing).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.json"));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    let err = RunnerConfig::load_from_file(&broken).unwrap_err();
    assert!(format!("{:#}", err).contains("parse"));
}

// =============================================================================
// Profiles
// =============================================================================

#[test]
fn profile_keeps_order_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");

    let profile = Profile::new(vec![
        "remove_tlp".to_string(),
        "grub_timeout".to_string(),
        "reduce_ssd_writes".to_string(),
    ]);
    profile.save_to_file(&path).unwrap();

    let loaded = Profile::load_from_file(&path).unwrap();
    assert_eq!(loaded, profile);
    assert!(loaded.validate(&TaskRegistry::builtin()).is_ok());
}

#[test]
fn validate_profile_command() {
    let dir = tempfile::tempdir().unwrap();
    let registry = TaskRegistry::builtin();

    let good = dir.path().join("good.json");
    fs::write(&good, r#"{ "tasks": ["install_preload", "apt_no_languages"] }"#).unwrap();
    assert!(headless::validate_profile(&good, &registry));

    let unknown = dir.path().join("unknown.json");
    fs::write(&unknown, r#"{ "tasks": ["install_preload", "overclock_cpu"] }"#).unwrap();
    assert!(!headless::validate_profile(&unknown, &registry));

    let missing = dir.path().join("missing.json");
    assert!(!headless::validate_profile(&missing, &registry));
}

#[test]
fn load_selection_prefers_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");
    Profile::new(vec!["remove_tlp".to_string()]).save_to_file(&path).unwrap();

    let registry = TaskRegistry::builtin();
    let selection = headless::load_selection(Vec::new(), Some(&path), &registry).unwrap();
    assert_eq!(selection.ids(), ["remove_tlp".to_string()]);
}
