//! Operator jogging: finite steps and run-to-end moves.

use crate::config::units::Steps;
use crate::config::TravelLimits;
use crate::motion::Direction;
use crate::motor::RailMotion;

/// State of a continuous jog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JogState {
    /// End of travel the rail is running toward.
    pub continuous_target: Option<Steps>,
    /// Whether a continuous jog owns the rail.
    pub active: bool,
}

/// Applies jog commands to the rail.
#[derive(Debug, Clone)]
pub struct JogController {
    state: JogState,
    limits: TravelLimits,
}

impl JogController {
    /// Create an idle jog controller.
    pub fn new(limits: TravelLimits) -> Self {
        Self {
            state: JogState::default(),
            limits,
        }
    }

    /// Current jog state.
    #[inline]
    pub fn state(&self) -> &JogState {
        &self.state
    }

    /// Whether a continuous jog is running.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Move `count` steps relative to the current target.
    ///
    /// A running continuous jog is taken over instead: the move is counted
    /// from where the rail is now, and the rail is retargeted without being
    /// stopped first.
    pub fn step<M: RailMotion>(&mut self, motion: &mut M, direction: Direction, count: u32) {
        let delta = i64::from(count) * direction.sign();
        debug!("jog {} steps", delta);

        if self.state.active {
            self.state = JogState::default();
            motion.move_to(motion.position().offset(delta));
        } else {
            motion.move_by(delta);
        }
    }

    /// Run toward the end of travel in `direction`.
    pub fn start_continuous<M: RailMotion>(&mut self, motion: &mut M, direction: Direction) {
        let target = match direction {
            Direction::Forward => self.limits.max(),
            Direction::Backward => self.limits.min(),
        };

        debug!("continuous jog to {}", target);
        motion.move_to(target);
        self.state = JogState {
            continuous_target: Some(target),
            active: true,
        };
    }

    /// Halt the rail where it is.
    pub fn stop_continuous<M: RailMotion>(&mut self, motion: &mut M) {
        debug!("continuous jog stopped at {}", motion.position());
        motion.stop();
        self.state = JogState::default();
    }

    /// Halt a running continuous jog. Does nothing otherwise.
    pub fn halt<M: RailMotion>(&mut self, motion: &mut M) {
        if self.state.active {
            self.stop_continuous(motion);
        }
    }

    /// Clear the jog once its end is reached or the target was taken over.
    pub fn poll<M: RailMotion>(&mut self, motion: &M) {
        if !self.state.active {
            return;
        }

        let superseded = self.state.continuous_target != Some(motion.target());
        if superseded || motion.is_at_target() {
            trace!("continuous jog finished");
            self.state = JogState::default();
        }
    }
}
