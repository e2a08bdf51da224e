//! Motion execution - step scheduling.

use super::profile::{MotionPhase, MotionProfile};

/// Runtime state during motion execution.
#[derive(Debug, Clone)]
pub struct MotionExecutor {
    /// The computed profile being executed.
    profile: MotionProfile,

    /// Steps already taken (0 to total_steps).
    current_step: u32,

    /// Current phase of motion.
    phase: MotionPhase,
}

impl MotionExecutor {
    /// Create a new executor for a motion profile.
    pub fn new(profile: MotionProfile) -> Self {
        let phase = profile.phase_at(0);
        Self {
            profile,
            current_step: 0,
            phase,
        }
    }

    /// Check if motion is complete.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.phase == MotionPhase::Complete
    }

    /// Get the number of steps already taken.
    #[inline]
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// Get steps remaining.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.profile.total_steps.saturating_sub(self.current_step)
    }

    /// Get the current phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Interval in microseconds to wait before the next step.
    #[inline]
    pub fn next_interval_us(&self) -> u32 {
        self.profile.interval_at(self.current_step)
    }

    /// Get the motion profile.
    #[inline]
    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Record one step as taken.
    ///
    /// Returns `true` if more steps remain.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }

        self.current_step += 1;
        self.phase = self.profile.phase_at(self.current_step);

        !self.is_complete()
    }
}
