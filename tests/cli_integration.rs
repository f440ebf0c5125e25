//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

use keypulse::cli::{parse_args_from, Args};
use keypulse::config::{Config, ConfigError};
use keypulse::KeySpec;

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("keypulse")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

/// Load with an empty environment so ambient `KEYPULSE_*` variables
/// cannot leak into assertions.
fn load(args: &Args) -> Result<Config, ConfigError> {
    Config::load_with_env(args, |_| None)
}

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults_resolve_to_documented_values() {
    let parsed = parse_args_from(args(&[])).unwrap();
    let config = load(&parsed).unwrap();

    assert_eq!(config.timing.interval_secs, 2.0);
    assert_eq!(config.timing.delay_secs, 3.0);
    assert!(config.timing.max_presses.is_none());
    assert_eq!(config.delay(), Duration::from_secs(3));
}

#[test]
fn test_cli_full_options() {
    let parsed = parse_args_from(args(&[
        "--interval",
        "0.1",
        "--max-presses",
        "3",
        "--delay",
        "0",
        "--modifier",
        "ctrl",
        "--key",
        "enter",
        "-l",
        "debug",
    ]))
    .unwrap();

    let config = load(&parsed).unwrap();
    let settings = config.loop_settings();

    assert_eq!(settings.interval, Duration::from_millis(100));
    assert_eq!(settings.max_presses, Some(3));
    assert_eq!(settings.chord.modifier, KeySpec::Control);
    assert_eq!(settings.chord.action, KeySpec::Return);
    assert_eq!(config.delay(), Duration::ZERO);
    assert_eq!(config.log_filter(), Some("debug"));
}

#[test]
fn test_cli_zero_interval_rejected() {
    let parsed = parse_args_from(args(&["--interval", "0"])).unwrap();
    let err = load(&parsed).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("interval"));
}

#[test]
fn test_cli_negative_delay_rejected() {
    let parsed = parse_args_from(args(&["--delay", "-2"])).unwrap();
    assert!(load(&parsed).is_err());
}

#[test]
fn test_cli_out_of_range_seconds_rejected() {
    for flag in ["--interval", "--delay"] {
        let parsed = parse_args_from(args(&[flag, "1e20"])).unwrap();
        let err = load(&parsed).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{flag}");
    }
}

#[test]
fn test_cli_invalid_number() {
    assert!(parse_args_from(args(&["--max-presses", "many"])).is_err());
    assert!(parse_args_from(args(&["--interval"])).is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let file = config_file(
        r#"{
        "timing": {
            "interval_secs": 1.5,
            "delay_secs": 0.5,
            "max_presses": 12
        },
        "chord": {
            "modifier": "alt",
            "action": "tab",
            "hold_ms": 75
        },
        "failures": {
            "max_consecutive": 4
        },
        "logging": {
            "level": "warn"
        }
    }"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    let settings = config.loop_settings();

    assert_eq!(settings.interval, Duration::from_millis(1500));
    assert_eq!(settings.max_presses, Some(12));
    assert_eq!(settings.chord.modifier, KeySpec::Alt);
    assert_eq!(settings.chord.action, KeySpec::Tab);
    assert_eq!(settings.chord.hold, Duration::from_millis(75));
    assert_eq!(settings.max_consecutive_failures, Some(4));
    assert_eq!(config.delay(), Duration::from_millis(500));
    assert_eq!(config.log_filter(), Some("warn"));
}

#[test]
fn test_config_priority_cli_over_file() {
    let file = config_file(
        r#"{
        "timing": {
            "interval_secs": 10.0,
            "max_presses": 100
        }
    }"#,
    );

    let args = Args {
        interval: Some(0.5),
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = load(&args).unwrap();

    // CLI value wins, file value survives where the CLI is silent
    assert_eq!(config.timing.interval_secs, 0.5);
    assert_eq!(config.timing.max_presses, Some(100));
}

#[test]
fn test_config_invalid_file_value_rejected_on_load() {
    let file = config_file(r#"{"timing": {"interval_secs": -1}}"#);

    let args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    assert!(matches!(load(&args), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_cli_can_fix_file_value() {
    let file = config_file(r#"{"timing": {"interval_secs": -1}}"#);

    let args = Args {
        interval: Some(1.0),
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    assert!(load(&args).is_ok());
}

#[test]
fn test_config_malformed_json() {
    let file = config_file("{ not json");

    let args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let err = load(&args).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().contains("parse"));
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_partial_deserialization() {
    let json = r#"{"chord": {"action": "space"}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.chord.action, KeySpec::Space);
    assert_eq!(config.chord.modifier, KeySpec::Meta); // Default
    assert_eq!(config.timing.interval_secs, 2.0); // Default
}
