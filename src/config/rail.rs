//! Rail configuration - root configuration structure.

use core::time::Duration;

use serde::Deserialize;

use super::limits::TravelLimits;
use super::units::{millis, Steps};

/// Root configuration structure from TOML.
///
/// Every section is optional; omitted values fall back to the stock rail
/// (210 000 steps of travel, 16 000 steps/s, 50 ms shutter pulse).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RailConfig {
    /// Stepper drive and travel bound.
    #[serde(default)]
    pub rail: DriveConfig,

    /// Camera trigger.
    #[serde(default)]
    pub shutter: ShutterConfig,

    /// Outbound status cadence.
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Motion stall detection.
    #[serde(default)]
    pub watchdog: WatchdogConfig,
}

/// Stepper drive parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    /// Maximum absolute position (far end of the rail).
    #[serde(default = "default_travel_limit")]
    pub travel_limit_steps: i64,

    /// Cruise speed in steps per second.
    #[serde(default = "default_max_speed")]
    pub max_speed_steps_per_sec: f32,

    /// Acceleration and deceleration in steps per second squared.
    #[serde(default = "default_acceleration")]
    pub acceleration_steps_per_sec2: f32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// STEP pulse high time in microseconds.
    #[serde(default = "default_pulse_width")]
    pub pulse_width_us: u32,
}

/// Camera trigger parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ShutterConfig {
    /// How long the trigger line is held active.
    #[serde(default = "default_shutter_pulse")]
    pub pulse_ms: u32,
}

/// Telemetry cadence.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Minimum spacing between position reports.
    #[serde(default = "default_position_interval")]
    pub position_interval_ms: u32,

    /// Re-send stacking progress at this interval while a session runs.
    #[serde(default)]
    pub progress_interval_ms: Option<u32>,
}

/// Motion stall detection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchdogConfig {
    /// Abort a session whose rail has not reached its target within this time.
    ///
    /// Unset means a stuck rail stalls the session indefinitely.
    #[serde(default)]
    pub motion_timeout_ms: Option<u32>,
}

fn default_travel_limit() -> i64 {
    210_000
}

fn default_max_speed() -> f32 {
    16_000.0
}

fn default_acceleration() -> f32 {
    16_000.0
}

fn default_pulse_width() -> u32 {
    2
}

fn default_shutter_pulse() -> u32 {
    50
}

fn default_position_interval() -> u32 {
    250
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            travel_limit_steps: default_travel_limit(),
            max_speed_steps_per_sec: default_max_speed(),
            acceleration_steps_per_sec2: default_acceleration(),
            invert_direction: false,
            pulse_width_us: default_pulse_width(),
        }
    }
}

impl Default for ShutterConfig {
    fn default() -> Self {
        Self {
            pulse_ms: default_shutter_pulse(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            position_interval_ms: default_position_interval(),
            progress_interval_ms: None,
        }
    }
}

impl RailConfig {
    /// Travel bound derived from the drive section.
    pub fn travel_limits(&self) -> TravelLimits {
        TravelLimits::new(Steps(self.rail.travel_limit_steps))
    }

    /// Shutter pulse length.
    pub fn shutter_pulse(&self) -> Duration {
        millis(self.shutter.pulse_ms)
    }

    /// Minimum spacing between position reports.
    pub fn position_interval(&self) -> Duration {
        millis(self.telemetry.position_interval_ms)
    }

    /// Progress heartbeat interval, if enabled.
    pub fn progress_interval(&self) -> Option<Duration> {
        self.telemetry.progress_interval_ms.map(millis)
    }

    /// Motion watchdog timeout, if enabled.
    pub fn motion_timeout(&self) -> Option<Duration> {
        self.watchdog.motion_timeout_ms.map(millis)
    }
}
