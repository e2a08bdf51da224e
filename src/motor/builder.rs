//! Builder pattern for StepperRail.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Steps;
use crate::config::{DriveConfig, RailConfig, TravelLimits};
use crate::error::{ConfigError, Error, Result};

use super::driver::StepperRail;

/// Builder for creating StepperRail instances.
pub struct StepperRailBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    drive: DriveConfig,
}

impl<STEP, DIR, DELAY> Default for StepperRailBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, DELAY> StepperRailBuilder<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder with the stock drive parameters.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            delay: None,
            drive: DriveConfig::default(),
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the far end of travel.
    pub fn travel_limit(mut self, limit: Steps) -> Self {
        self.drive.travel_limit_steps = limit.0;
        self
    }

    /// Set cruise speed in steps per second.
    pub fn max_speed(mut self, steps_per_sec: f32) -> Self {
        self.drive.max_speed_steps_per_sec = steps_per_sec;
        self
    }

    /// Set acceleration in steps per second squared.
    pub fn acceleration(mut self, steps_per_sec2: f32) -> Self {
        self.drive.acceleration_steps_per_sec2 = steps_per_sec2;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.drive.invert_direction = invert;
        self
    }

    /// Configure from a RailConfig.
    pub fn from_config(mut self, config: &RailConfig) -> Self {
        self.drive = config.rail.clone();
        self
    }

    /// Build the StepperRail.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin or the delay is missing, or the drive
    /// parameters are not positive.
    pub fn build(self) -> Result<StepperRail<STEP, DIR, DELAY>> {
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        let drive = self.drive;
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

        Ok(StepperRail::new(
            step_pin,
            dir_pin,
            delay,
            TravelLimits::new(Steps(drive.travel_limit_steps)),
            drive.max_speed_steps_per_sec,
            drive.acceleration_steps_per_sec2,
            drive.invert_direction,
            drive.pulse_width_us.max(1),
        ))
    }
}
