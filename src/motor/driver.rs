//! Stepper rail driver.
//!
//! Generic over embedded-hal 1.0 pin types. Never blocks for longer than one
//! STEP pulse: each [`RailMotion::poll`] emits at most one step, and only once
//! the profile says it is due.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Instant, Steps};
use crate::config::TravelLimits;
use crate::error::MotionError;
use crate::motion::{Direction, MotionExecutor, MotionPhase, MotionProfile};

use super::RailMotion;

/// Stepper-driven camera rail.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider for the STEP pulse width (must implement `DelayNs`)
pub struct StepperRail<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = forward, unless inverted).
    dir_pin: DIR,

    /// Delay provider for the STEP pulse.
    delay: DELAY,

    /// Current absolute position.
    position: Steps,

    /// Commanded absolute target, always inside `limits`.
    target: Steps,

    /// Physical travel bound.
    limits: TravelLimits,

    /// Cruise speed in steps/sec.
    max_speed: f32,

    /// Acceleration in steps/sec².
    acceleration: f32,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// STEP pulse high time.
    pulse_width_us: u32,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Executor for the move in progress (if any).
    executor: Option<MotionExecutor>,

    /// When the next step is due; `None` steps on the next poll.
    next_step_at: Option<Instant>,
}

impl<STEP, DIR, DELAY> StepperRail<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        limits: TravelLimits,
        max_speed: f32,
        acceleration: f32,
        invert_direction: bool,
        pulse_width_us: u32,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            position: Steps::ZERO,
            target: Steps::ZERO,
            limits,
            max_speed,
            acceleration,
            invert_direction,
            pulse_width_us,
            current_direction: None,
            executor: None,
            next_step_at: None,
        }
    }

    /// Get the travel bound.
    #[inline]
    pub fn limits(&self) -> TravelLimits {
        self.limits
    }

    /// Get current motion phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.executor
            .as_ref()
            .map(|e| e.phase())
            .unwrap_or(MotionPhase::Complete)
    }

    /// Redefine the current position without moving (e.g. after homing).
    ///
    /// Any move in progress is dropped.
    pub fn set_position(&mut self, position: Steps) {
        self.position = position;
        self.target = position;
        self.executor = None;
        self.next_step_at = None;
    }

    /// Release the pins and delay provider.
    pub fn release(self) -> (STEP, DIR, DELAY) {
        (self.step_pin, self.dir_pin, self.delay)
    }

    /// Rebuild the profile toward `target`.
    ///
    /// From rest the move starts a fresh ramp. A rail already moving toward
    /// the new target keeps its speed. A rail moving away from it brakes
    /// along its heading first, and [`poll`](RailMotion::poll) plans the way
    /// back once it has stopped.
    fn plan(&mut self) {
        let delta = self.target.0 - self.position.0;

        let Some((heading, speed, remaining)) = self.in_motion() else {
            self.next_step_at = None;
            self.executor = (delta != 0).then(|| {
                MotionExecutor::new(MotionProfile::trapezoidal(
                    delta,
                    self.max_speed,
                    self.acceleration,
                ))
            });
            return;
        };

        let profile = if delta != 0 && Direction::from_steps(delta) == heading {
            MotionProfile::from_speed(delta, speed, self.max_speed, self.acceleration)
        } else {
            let braking = MotionProfile::stopping_steps(speed, self.acceleration).min(remaining);
            trace!("braking {} steps before reversing", braking);
            MotionProfile::from_speed(
                i64::from(braking) * heading.sign(),
                speed,
                self.max_speed,
                self.acceleration,
            )
        };
        self.executor = Some(MotionExecutor::new(profile));
    }

    /// Heading, speed in steps/sec and steps left of a move under way.
    fn in_motion(&self) -> Option<(Direction, f32, u32)> {
        self.executor
            .as_ref()
            .filter(|e| e.current_step() > 0 && !e.is_complete())
            .map(|e| {
                let speed = 1_000_000.0 / e.next_interval_us().max(1) as f32;
                (e.profile().direction, speed, e.steps_remaining())
            })
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), MotionError> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Forward => !self.invert_direction,
            Direction::Backward => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotionError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotionError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}

impl<STEP, DIR, DELAY> RailMotion for StepperRail<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn move_to(&mut self, target: Steps) {
        let target = self.limits.clamp(target);
        if target == self.target {
            return;
        }

        self.target = target;
        self.plan();
    }

    #[inline]
    fn position(&self) -> Steps {
        self.position
    }

    #[inline]
    fn target(&self) -> Steps {
        self.target
    }

    fn stop(&mut self) {
        self.target = self.position;
        self.executor = None;
        self.next_step_at = None;
    }

    fn poll(&mut self, now: Instant) -> Result<(), MotionError> {
        let direction = match &self.executor {
            Some(executor) if !executor.is_complete() => executor.profile().direction,
            _ => return Ok(()),
        };

        if self.next_step_at.is_some_and(|due| now < due) {
            return Ok(());
        }

        self.set_direction(direction)?;

        self.step_pin.set_high().map_err(|_| MotionError::PinError)?;
        self.delay.delay_us(self.pulse_width_us);
        self.step_pin.set_low().map_err(|_| MotionError::PinError)?;

        self.position = self.position.offset(direction.sign());

        let next = match self.executor.as_mut() {
            Some(executor) => executor.advance().then(|| executor.next_interval_us()),
            None => None,
        };

        match next {
            Some(interval_us) => {
                self.next_step_at = Some(now + Duration::from_micros(u64::from(interval_us)));
            }
            None => {
                self.executor = None;
                self.next_step_at = None;

                // Came to rest short of a target that moved behind the rail.
                if self.position != self.target {
                    self.plan();
                    if let Some(executor) = &self.executor {
                        let settle = u64::from(executor.profile().initial_interval_us);
                        self.next_step_at = Some(now + Duration::from_micros(settle));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::StepperRailBuilder;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    fn pulses(count: usize) -> Vec<PinTransaction> {
        let mut transactions = Vec::new();
        for _ in 0..count {
            transactions.push(PinTransaction::set(PinState::High));
            transactions.push(PinTransaction::set(PinState::Low));
        }
        transactions
    }

    #[test]
    fn test_forward_move_pulses_step_pin() {
        let mut step = PinMock::new(&pulses(3));
        let mut dir = PinMock::new(&[PinTransaction::set(PinState::High)]);

        let mut rail = StepperRailBuilder::new()
            .step_pin(step.clone())
            .dir_pin(dir.clone())
            .delay(NoopDelay::new())
            .travel_limit(Steps(1_000))
            .build()
            .unwrap();

        rail.move_by(3);
        assert_eq!(rail.target(), Steps(3));
        assert!(!rail.is_at_target());

        // Far enough apart that every step is due.
        for i in 0..10 {
            rail.poll(Instant::from_millis(i * 1_000)).unwrap();
        }

        assert_eq!(rail.position(), Steps(3));
        assert!(rail.is_at_target());

        step.done();
        dir.done();
    }

    #[test]
    fn test_step_not_due_is_skipped() {
        let mut step = PinMock::new(&pulses(1));
        let mut dir = PinMock::new(&[PinTransaction::set(PinState::High)]);

        let mut rail = StepperRailBuilder::new()
            .step_pin(step.clone())
            .dir_pin(dir.clone())
            .delay(NoopDelay::new())
            .build()
            .unwrap();

        rail.move_by(2);
        rail.poll(Instant::from_micros(0)).unwrap();
        // Second step is not due one microsecond later.
        rail.poll(Instant::from_micros(1)).unwrap();
        assert_eq!(rail.position(), Steps(1));

        step.done();
        dir.done();
    }

    #[test]
    fn test_inverted_backward_move_sets_dir_high() {
        let mut step = PinMock::new(&pulses(1));
        let mut dir = PinMock::new(&[PinTransaction::set(PinState::High)]);

        let mut rail = StepperRailBuilder::new()
            .step_pin(step.clone())
            .dir_pin(dir.clone())
            .delay(NoopDelay::new())
            .invert_direction(true)
            .build()
            .unwrap();

        rail.set_position(Steps(10));
        rail.move_by(-1);
        rail.poll(Instant::ZERO).unwrap();
        assert_eq!(rail.position(), Steps(9));

        step.done();
        dir.done();
    }

    #[test]
    fn test_targets_are_clamped() {
        let mut step = PinMock::new(&[]);
        let mut dir = PinMock::new(&[]);

        let mut rail = StepperRailBuilder::new()
            .step_pin(step.clone())
            .dir_pin(dir.clone())
            .delay(NoopDelay::new())
            .travel_limit(Steps(500))
            .build()
            .unwrap();

        rail.move_to(Steps(10_000));
        assert_eq!(rail.target(), Steps(500));

        rail.move_by(-20_000);
        assert_eq!(rail.target(), Steps(0));
        assert!(rail.is_at_target());

        step.done();
        dir.done();
    }

    #[test]
    fn test_stop_holds_position() {
        let mut step = PinMock::new(&pulses(1));
        let mut dir = PinMock::new(&[PinTransaction::set(PinState::High)]);

        let mut rail = StepperRailBuilder::new()
            .step_pin(step.clone())
            .dir_pin(dir.clone())
            .delay(NoopDelay::new())
            .build()
            .unwrap();

        rail.move_to(Steps(100));
        rail.poll(Instant::ZERO).unwrap();
        rail.stop();

        assert_eq!(rail.target(), Steps(1));
        assert!(rail.is_at_target());
        assert_eq!(rail.phase(), MotionPhase::Complete);

        // Nothing left to do.
        rail.poll(Instant::from_millis(1_000)).unwrap();

        step.done();
        dir.done();
    }

    fn ramping_rail(step: &PinMock, dir: &PinMock) -> StepperRail<PinMock, PinMock, NoopDelay> {
        StepperRailBuilder::new()
            .step_pin(step.clone())
            .dir_pin(dir.clone())
            .delay(NoopDelay::new())
            .max_speed(1_000.0)
            .acceleration(2_000.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_retarget_ahead_keeps_speed() {
        let mut step = PinMock::new(&pulses(20));
        let mut dir = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut rail = ramping_rail(&step, &dir);

        rail.move_to(Steps(1_000));
        for i in 0..20 {
            rail.poll(Instant::from_millis(i * 1_000)).unwrap();
        }
        let before = rail.executor.as_ref().unwrap().next_interval_us();

        rail.move_to(Steps(2_000));
        let executor = rail.executor.as_ref().unwrap();
        assert!(executor.next_interval_us() <= before);
        assert!(executor.next_interval_us() < executor.profile().final_interval_us);
        assert_eq!(executor.profile().total_steps, 1_980);

        step.done();
        dir.done();
    }

    #[test]
    fn test_reverse_brakes_before_turning() {
        let profile = MotionProfile::trapezoidal(1_000, 1_000.0, 2_000.0);
        let speed = 1_000_000.0 / profile.interval_at(20) as f32;
        let braking = MotionProfile::stopping_steps(speed, 2_000.0) as usize;
        assert!(braking > 0);

        let mut step = PinMock::new(&pulses(2 * (20 + braking)));
        let mut dir = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut rail = ramping_rail(&step, &dir);

        rail.move_to(Steps(1_000));
        for i in 0..20 {
            rail.poll(Instant::from_millis(i * 1_000)).unwrap();
        }

        rail.move_to(Steps(0));
        assert_eq!(rail.target(), Steps(0));

        let mut furthest = rail.position();
        for i in 20..200 {
            rail.poll(Instant::from_millis(i * 1_000)).unwrap();
            furthest = furthest.max(rail.position());
            if rail.is_at_target() {
                break;
            }
        }

        assert_eq!(furthest, Steps(20 + braking as i64));
        assert_eq!(rail.position(), Steps(0));
        assert_eq!(rail.phase(), MotionPhase::Complete);

        step.done();
        dir.done();
    }
}
