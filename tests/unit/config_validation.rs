//! Unit tests for configuration validation.

use stacking_rail::config::{parse_config, validate_config, RailConfig};
use stacking_rail::error::{ConfigError, Error};

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[rail]
travel_limit_steps = 210000
max_speed_steps_per_sec = 16000.0
acceleration_steps_per_sec2 = 16000.0

[watchdog]
motion_timeout_ms = 10000
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a negative travel limit.
#[test]
fn test_negative_travel_limit() {
    let result = parse_config("[rail]\ntravel_limit_steps = -10\n");

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidTravelLimit(-10)))
    ));
}

/// Test validation fails for zero speed.
#[test]
fn test_zero_speed() {
    let result = parse_config("[rail]\nmax_speed_steps_per_sec = 0.0\n");

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidMaxSpeed(_)))
    ));
}

/// Test validation fails for NaN acceleration.
#[test]
fn test_nan_acceleration() {
    let mut config = RailConfig::default();
    config.rail.acceleration_steps_per_sec2 = f32::NAN;

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidAcceleration(_)))
    ));
}

/// Test that zero durations are named in the error.
#[test]
fn test_zero_durations_are_named() {
    let cases = [
        ("[rail]\npulse_width_us = 0\n", "rail.pulse_width_us"),
        ("[shutter]\npulse_ms = 0\n", "shutter.pulse_ms"),
        (
            "[telemetry]\nposition_interval_ms = 0\n",
            "telemetry.position_interval_ms",
        ),
        (
            "[telemetry]\nprogress_interval_ms = 0\n",
            "telemetry.progress_interval_ms",
        ),
        (
            "[watchdog]\nmotion_timeout_ms = 0\n",
            "watchdog.motion_timeout_ms",
        ),
    ];

    for (toml_str, key) in cases {
        match parse_config(toml_str) {
            Err(Error::Config(ConfigError::ZeroDuration(name))) => assert_eq!(name, key),
            other => panic!("expected ZeroDuration({key}), got {other:?}"),
        }
    }
}

/// Test that errors render readable messages.
#[test]
fn test_error_display() {
    let err = Error::Config(ConfigError::InvalidTravelLimit(0));
    assert_eq!(
        err.to_string(),
        "Configuration error: Invalid travel limit: 0. Must be > 0"
    );
}
