//! Unit tests for TOML configuration parsing.

use std::io::Write;

use stacking_rail::config::{load_config, parse_config, RailConfig};
use stacking_rail::error::{ConfigError, Error};
use stacking_rail::Steps;

/// Test parsing a complete rail configuration.
#[test]
fn test_parse_full_config() {
    let toml_str = r#"
[rail]
travel_limit_steps = 120000
max_speed_steps_per_sec = 8000.0
acceleration_steps_per_sec2 = 4000.0
invert_direction = true
pulse_width_us = 5

[shutter]
pulse_ms = 80

[telemetry]
position_interval_ms = 100
progress_interval_ms = 1000

[watchdog]
motion_timeout_ms = 30000
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.rail.travel_limit_steps, 120_000);
    assert_eq!(config.rail.max_speed_steps_per_sec, 8_000.0);
    assert_eq!(config.rail.acceleration_steps_per_sec2, 4_000.0);
    assert!(config.rail.invert_direction);
    assert_eq!(config.rail.pulse_width_us, 5);
    assert_eq!(config.shutter.pulse_ms, 80);
    assert_eq!(config.telemetry.position_interval_ms, 100);
    assert_eq!(config.telemetry.progress_interval_ms, Some(1_000));
    assert_eq!(config.watchdog.motion_timeout_ms, Some(30_000));
    assert_eq!(config.travel_limits().max(), Steps(120_000));
}

/// Test that omitted sections fall back to the stock rail.
#[test]
fn test_empty_config_uses_defaults() {
    let config = parse_config("").expect("Empty config should parse");
    let defaults = RailConfig::default();

    assert_eq!(config.rail.travel_limit_steps, 210_000);
    assert_eq!(config.rail.max_speed_steps_per_sec, 16_000.0);
    assert_eq!(config.shutter.pulse_ms, defaults.shutter.pulse_ms);
    assert_eq!(config.telemetry.progress_interval_ms, None);
    assert_eq!(config.motion_timeout(), None);
}

/// Test that a partial section keeps defaults for the rest.
#[test]
fn test_partial_section() {
    let config = parse_config("[rail]\ntravel_limit_steps = 5000\n").unwrap();

    assert_eq!(config.rail.travel_limit_steps, 5_000);
    assert_eq!(config.rail.pulse_width_us, 2);
}

/// Test that malformed TOML is reported as a parse error.
#[test]
fn test_malformed_toml() {
    let result = parse_config("[rail\ntravel_limit_steps = ");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test that a wrongly typed value is reported as a parse error.
#[test]
fn test_wrong_type() {
    let result = parse_config("[shutter]\npulse_ms = \"long\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join("stacking_rail_load_config_test.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[shutter]\npulse_ms = 120").unwrap();
    drop(file);

    let config = load_config(&path).expect("Failed to load config");
    assert_eq!(config.shutter.pulse_ms, 120);

    let _ = std::fs::remove_file(&path);
}

/// Test that a missing file is reported as an I/O error.
#[test]
fn test_load_missing_file() {
    let result = load_config("/nonexistent/stacking-rail.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
