//! Motion profile calculation.
//!
//! Provides symmetric trapezoidal motion profiles for rail moves.

use libm::{ceilf, sqrtf};

/// Direction of rail travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Away from home (positive step count).
    Forward,
    /// Toward home (negative step count).
    Backward,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Decode the `FWD` / `BCK` wire token.
    pub fn from_wire(token: &str) -> Option<Self> {
        match token {
            "FWD" => Some(Direction::Forward),
            "BCK" => Some(Direction::Backward),
            _ => None,
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

}

/// Current phase of motion execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Accelerating from rest toward cruise speed.
    Accelerating,
    /// Moving at constant cruise speed.
    Cruising,
    /// Decelerating from cruise speed to rest.
    Decelerating,
    /// Motion complete.
    Complete,
}

/// Computed motion profile for a move (trapezoidal).
#[derive(Debug, Clone)]
pub struct MotionProfile {
    /// Total steps to move (absolute value).
    pub total_steps: u32,

    /// Direction of motion.
    pub direction: Direction,

    /// Steps in acceleration phase.
    pub accel_steps: u32,

    /// Steps in cruise phase (constant speed).
    pub cruise_steps: u32,

    /// Steps in deceleration phase.
    pub decel_steps: u32,

    /// Step interval (microseconds) at the start of acceleration.
    pub initial_interval_us: u32,

    /// Step interval (microseconds) at cruise speed.
    pub cruise_interval_us: u32,

    /// Step interval (microseconds) of the last step, coming to rest.
    pub final_interval_us: u32,
}

impl MotionProfile {
    /// Create a trapezoidal motion profile starting from rest.
    ///
    /// # Arguments
    ///
    /// * `total_steps` - Signed step count (positive = forward)
    /// * `max_speed` - Cruise speed in steps/sec
    /// * `acceleration` - Acceleration and deceleration in steps/sec²
    pub fn trapezoidal(total_steps: i64, max_speed: f32, acceleration: f32) -> Self {
        Self::from_speed(total_steps, 0.0, max_speed, acceleration)
    }

    /// Create a profile for a rail already moving at `entry_speed` steps/sec
    /// in the direction of `total_steps`.
    ///
    /// The ramp up starts at the entry speed. If the move is too short to
    /// stop from there at `acceleration`, the whole move is one deceleration.
    pub fn from_speed(
        total_steps: i64,
        entry_speed: f32,
        max_speed: f32,
        acceleration: f32,
    ) -> Self {
        let direction = Direction::from_steps(total_steps);
        let steps = u32::try_from(total_steps.unsigned_abs()).unwrap_or(u32::MAX);

        if steps == 0 || max_speed <= 0.0 || acceleration <= 0.0 {
            return Self::zero();
        }

        let entry_speed = entry_speed.clamp(0.0, max_speed);
        let two_a = 2.0 * acceleration;

        // Distances from d = (v1² - v0²) / 2a
        let ramp_up = (max_speed * max_speed - entry_speed * entry_speed) / two_a;
        let ramp_down = max_speed * max_speed / two_a;
        let braking = entry_speed * entry_speed / two_a;

        // Starting from rest, the first step is taken at v = sqrt(2a)
        let rest_interval_us = (1_000_000.0 / sqrtf(two_a)) as u32;
        let max_interval_us = (1_000_000.0 / max_speed) as u32;
        let final_interval_us = rest_interval_us.max(max_interval_us);
        let initial_interval_us = if entry_speed > 0.0 {
            ((1_000_000.0 / entry_speed) as u32).clamp(max_interval_us, final_interval_us)
        } else {
            final_interval_us
        };

        let mut cruise_interval_us = max_interval_us;
        let (accel_steps, cruise_steps, decel_steps) = if braking >= steps as f32 {
            // Too short to speed up: brake from the entry speed over the whole move
            cruise_interval_us = initial_interval_us;
            (0, 0, steps)
        } else if ramp_up + ramp_down >= steps as f32 {
            // Triangle profile: cruise speed is never reached
            let accel_steps = ((steps as f32 - braking) / 2.0) as u32;
            (accel_steps, 0u32, steps - accel_steps)
        } else {
            let up = ramp_up as u32;
            let down = ramp_down as u32;
            (up, steps - up - down, down)
        };

        Self {
            total_steps: steps,
            direction,
            accel_steps,
            cruise_steps,
            decel_steps,
            initial_interval_us,
            cruise_interval_us,
            final_interval_us,
        }
    }

    /// Steps needed to come to rest from `speed` steps/sec.
    pub fn stopping_steps(speed: f32, acceleration: f32) -> u32 {
        if speed <= 0.0 || acceleration <= 0.0 {
            return 0;
        }
        ceilf(speed * speed / (2.0 * acceleration)) as u32
    }

    /// Create a zero-length profile (no motion).
    pub fn zero() -> Self {
        Self {
            total_steps: 0,
            direction: Direction::Forward,
            accel_steps: 0,
            cruise_steps: 0,
            decel_steps: 0,
            initial_interval_us: u32::MAX,
            cruise_interval_us: u32::MAX,
            final_interval_us: u32::MAX,
        }
    }

    /// Check if this is a zero-length profile.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.total_steps == 0
    }

    /// Get the phase at a given step number.
    pub fn phase_at(&self, step: u32) -> MotionPhase {
        if step >= self.total_steps {
            MotionPhase::Complete
        } else if step < self.accel_steps {
            MotionPhase::Accelerating
        } else if step < self.accel_steps + self.cruise_steps {
            MotionPhase::Cruising
        } else {
            MotionPhase::Decelerating
        }
    }

    /// Step interval in microseconds before the given step number.
    ///
    /// Linear interpolation from the initial to the cruise interval, then
    /// from the cruise to the final interval.
    pub fn interval_at(&self, step: u32) -> u32 {
        match self.phase_at(step) {
            MotionPhase::Complete => u32::MAX,
            MotionPhase::Cruising => self.cruise_interval_us,
            MotionPhase::Accelerating => {
                let span = self.initial_interval_us.saturating_sub(self.cruise_interval_us) as f32;
                let progress = step as f32 / self.accel_steps.max(1) as f32;
                (self.initial_interval_us as f32 - span * progress) as u32
            }
            MotionPhase::Decelerating => {
                let span = self.final_interval_us.saturating_sub(self.cruise_interval_us) as f32;
                let decel_step = step - self.accel_steps - self.cruise_steps;
                let progress = (decel_step + 1) as f32 / self.decel_steps.max(1) as f32;
                (self.cruise_interval_us as f32 + span * progress) as u32
            }
        }
    }
}
