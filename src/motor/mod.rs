//! Motor module for stacking-rail.
//!
//! Defines the [`RailMotion`] interface the controller drives, and the
//! embedded-hal stepper implementation of it.

mod builder;
mod driver;

pub use builder::StepperRailBuilder;
pub use driver::StepperRail;

use crate::config::units::{Instant, Steps};
use crate::error::MotionError;

/// Motion interface of the rail.
///
/// Moves are requests: nothing happens until [`poll`](RailMotion::poll) is
/// called from the tick loop. Relative moves are taken from the current
/// *target*, so a chain of relative moves sums exactly even while the rail is
/// still travelling.
pub trait RailMotion {
    /// Request a move to an absolute position.
    fn move_to(&mut self, target: Steps);

    /// Request a move relative to the current target.
    fn move_by(&mut self, delta: i64) {
        let target = self.target().offset(delta);
        self.move_to(target);
    }

    /// Current absolute position.
    fn position(&self) -> Steps;

    /// Commanded absolute target.
    fn target(&self) -> Steps;

    /// Whether the last requested move has completed.
    fn is_at_target(&self) -> bool {
        self.position() == self.target()
    }

    /// Halt at the current position.
    fn stop(&mut self);

    /// Advance by at most one control step.
    fn poll(&mut self, now: Instant) -> Result<(), MotionError>;
}
