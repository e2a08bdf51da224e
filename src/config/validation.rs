//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::RailConfig;

/// Validate a rail configuration.
///
/// Checks:
/// - Travel limit is positive
/// - Speed and acceleration are positive
/// - Pulse lengths are non-zero
/// - Optional intervals and timeouts are non-zero when present
pub fn validate_config(config: &RailConfig) -> Result<()> {
    let drive = &config.rail;

    if drive.travel_limit_steps <= 0 {
        return Err(Error::Config(ConfigError::InvalidTravelLimit(
            drive.travel_limit_steps,
        )));
    }

    if drive.max_speed_steps_per_sec.is_nan() || drive.max_speed_steps_per_sec <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(
            drive.max_speed_steps_per_sec,
        )));
    }

    if drive.acceleration_steps_per_sec2.is_nan() || drive.acceleration_steps_per_sec2 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            drive.acceleration_steps_per_sec2,
        )));
    }

    if drive.pulse_width_us == 0 {
        return Err(Error::Config(ConfigError::ZeroDuration("rail.pulse_width_us")));
    }

    if config.shutter.pulse_ms == 0 {
        return Err(Error::Config(ConfigError::ZeroDuration("shutter.pulse_ms")));
    }

    if config.telemetry.position_interval_ms == 0 {
        return Err(Error::Config(ConfigError::ZeroDuration(
            "telemetry.position_interval_ms",
        )));
    }

    if config.telemetry.progress_interval_ms == Some(0) {
        return Err(Error::Config(ConfigError::ZeroDuration(
            "telemetry.progress_interval_ms",
        )));
    }

    if config.watchdog.motion_timeout_ms == Some(0) {
        return Err(Error::Config(ConfigError::ZeroDuration(
            "watchdog.motion_timeout_ms",
        )));
    }

    Ok(())
}
