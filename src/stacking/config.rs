//! Stacking session parameters.

use core::time::Duration;

use crate::config::units::{millis, Steps};
use crate::error::{SessionError, SessionField};
use crate::motion::Direction;

/// Parameters as decoded from a stacking command; any of them may be unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionRequest {
    /// `PRE`, converted to milliseconds.
    pub pre_shutter_wait_ms: Option<u32>,
    /// `PST`, converted to milliseconds.
    pub post_shutter_wait_ms: Option<u32>,
    /// `STP`
    pub shutters_per_step: Option<u32>,
    /// `STS`
    pub step_size: Option<u32>,
    /// `DIR`
    pub direction: Option<Direction>,
    /// `SPS`
    pub start_position: Option<Steps>,
    /// `NST`
    pub total_steps: Option<u32>,
    /// `RTS`
    pub return_to_start: Option<bool>,
}

/// Complete, validated parameters of one stacking session.
///
/// Only obtainable through [`SessionConfig::try_from`], so every numeric
/// field is known to be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pre_shutter_wait: Duration,
    post_shutter_wait: Duration,
    shutters_per_step: u32,
    step_size: u32,
    direction: Direction,
    start_position: Option<Steps>,
    total_steps: u32,
    return_to_start: bool,
}

impl TryFrom<SessionRequest> for SessionConfig {
    type Error = SessionError;

    fn try_from(request: SessionRequest) -> Result<Self, Self::Error> {
        fn required<T>(value: Option<T>, field: SessionField) -> Result<T, SessionError> {
            value.ok_or(SessionError::ConfigIncomplete(field))
        }

        fn non_zero(value: Option<u32>, field: SessionField) -> Result<u32, SessionError> {
            required(value.filter(|v| *v != 0), field)
        }

        Ok(Self {
            pre_shutter_wait: millis(non_zero(
                request.pre_shutter_wait_ms,
                SessionField::PreShutterWait,
            )?),
            post_shutter_wait: millis(non_zero(
                request.post_shutter_wait_ms,
                SessionField::PostShutterWait,
            )?),
            shutters_per_step: non_zero(request.shutters_per_step, SessionField::ShuttersPerStep)?,
            step_size: non_zero(request.step_size, SessionField::StepSize)?,
            direction: required(request.direction, SessionField::Direction)?,
            start_position: request.start_position,
            total_steps: non_zero(request.total_steps, SessionField::TotalSteps)?,
            return_to_start: required(request.return_to_start, SessionField::ReturnToStart)?,
        })
    }
}

impl SessionConfig {
    /// Wait before each shutter release.
    #[inline]
    pub fn pre_shutter_wait(&self) -> Duration {
        self.pre_shutter_wait
    }

    /// Wait after the last release of a step, before moving.
    #[inline]
    pub fn post_shutter_wait(&self) -> Duration {
        self.post_shutter_wait
    }

    /// Releases per rail position.
    #[inline]
    pub fn shutters_per_step(&self) -> u32 {
        self.shutters_per_step
    }

    /// Steps per rail move.
    #[inline]
    pub fn step_size(&self) -> u32 {
        self.step_size
    }

    /// Travel direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Absolute start position; `None` starts where the rail is.
    #[inline]
    pub fn start_position(&self) -> Option<Steps> {
        self.start_position
    }

    /// Number of rail moves.
    #[inline]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Whether to undo the accumulated displacement at the end.
    #[inline]
    pub fn return_to_start(&self) -> bool {
        self.return_to_start
    }

    /// Signed displacement of one rail move.
    #[inline]
    pub fn step_delta(&self) -> i64 {
        i64::from(self.step_size) * self.direction.sign()
    }
}
