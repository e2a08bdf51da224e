//! Stacking session state machine.
//!
//! One [`StackingSession`] lives for the lifetime of the controller. It is
//! either idle or running exactly one session; starting a new one cancels the
//! old one first. All waits are deadlines checked from [`advance`], which the
//! tick loop calls once per iteration.
//!
//! [`advance`]: StackingSession::advance

use core::time::Duration;

use crate::config::units::{Instant, Steps};
use crate::config::TravelLimits;
use crate::error::MotionError;
use crate::motor::RailMotion;
use crate::shutter::Shutter;
use crate::telemetry::{Progress, StackingUpdate};

use super::SessionConfig;

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No session.
    #[default]
    Idle,
    /// Travelling to the requested start position.
    MoveToStart,
    /// Releasing the shutter at the current position.
    TakePictures,
    /// Waiting out the post-shutter delay, then moving one step.
    MoveRail,
    /// All moves made; returns the rail and goes idle once it has settled.
    StopStacking,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionOutcome {
    /// All steps were taken.
    Completed,
    /// Stopped by command, by a jog, or by a newer session.
    Cancelled,
    /// The rail did not reach its target within the motion timeout.
    Stalled,
}

/// Mutable progress of the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Current phase.
    pub phase: Phase,
    /// Rail moves made so far.
    pub steps_taken: u32,
    /// Shutter releases at the current position.
    pub shutters_fired_this_step: u32,
    /// When the pending wait of this phase ends.
    pub phase_deadline: Option<Instant>,
    /// When the last progress update was produced.
    pub last_telemetry_sent: Option<Instant>,
}

/// Owner of the single stacking session.
#[derive(Debug)]
pub struct StackingSession {
    config: Option<SessionConfig>,
    state: SessionState,
    limits: TravelLimits,
    motion_timeout: Option<Duration>,
    /// Start of the current rail position, for per-step elapsed time.
    step_started: Instant,
    /// Set while the session waits on the rail.
    motion_since: Option<Instant>,
    /// Whether the move to the start position has been issued.
    move_issued: bool,
    /// Rail target the first picture is taken from.
    anchor: Option<Steps>,
    last_outcome: Option<SessionOutcome>,
}

impl StackingSession {
    /// Create an idle session owner.
    ///
    /// With `motion_timeout` unset, a rail that never reaches its target
    /// holds the session in its current phase indefinitely.
    pub fn new(limits: TravelLimits, motion_timeout: Option<Duration>) -> Self {
        Self {
            config: None,
            state: SessionState::default(),
            limits,
            motion_timeout,
            step_started: Instant::ZERO,
            motion_since: None,
            move_issued: false,
            anchor: None,
            last_outcome: None,
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Whether a session is running.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.phase != Phase::Idle
    }

    /// Progress of the running session.
    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Parameters of the running session.
    #[inline]
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    /// How the most recent session ended.
    #[inline]
    pub fn last_outcome(&self) -> Option<SessionOutcome> {
        self.last_outcome
    }

    /// Start a session, cancelling the running one first.
    ///
    /// Returns the end marker of the cancelled session, if there was one.
    pub fn start<M: RailMotion>(
        &mut self,
        config: SessionConfig,
        now: Instant,
        motion: &mut M,
    ) -> Option<StackingUpdate> {
        let superseded = self.cancel(motion);

        let phase = match config.start_position() {
            Some(_) => Phase::MoveToStart,
            None => Phase::TakePictures,
        };

        info!(
            "stacking started: {} x {} steps, {} shots each",
            config.total_steps(),
            config.step_size(),
            config.shutters_per_step()
        );

        self.config = Some(config);
        self.state = SessionState {
            phase,
            ..SessionState::default()
        };
        self.step_started = now;
        self.motion_since = Some(now);
        self.move_issued = false;
        self.anchor = match phase {
            Phase::TakePictures => Some(motion.target()),
            _ => None,
        };

        superseded
    }

    /// Cancel the running session. Does nothing when idle.
    pub fn cancel<M: RailMotion>(&mut self, motion: &mut M) -> Option<StackingUpdate> {
        match self.state.phase {
            Phase::Idle => None,
            // The last move was already made.
            Phase::StopStacking => Some(self.finish(SessionOutcome::Completed, motion)),
            Phase::MoveToStart => {
                motion.stop();
                Some(self.finish(SessionOutcome::Cancelled, motion))
            }
            Phase::TakePictures | Phase::MoveRail => {
                Some(self.finish(SessionOutcome::Cancelled, motion))
            }
        }
    }

    /// Evaluate the current phase once.
    ///
    /// Performs at most the actions of one phase and returns the update to
    /// publish, if any.
    pub fn advance<M: RailMotion, S: Shutter>(
        &mut self,
        now: Instant,
        motion: &mut M,
        shutter: &mut S,
    ) -> Option<StackingUpdate> {
        let config = self.config?;

        match self.state.phase {
            Phase::Idle => None,
            Phase::MoveToStart => {
                if !self.move_issued {
                    if let Some(start) = config.start_position() {
                        let start = self.limits.clamp(start);
                        debug!("moving to start position {}", start);
                        motion.move_to(start);
                    }
                    self.move_issued = true;
                    self.motion_since = Some(now);
                }

                if motion.is_at_target() {
                    self.motion_since = None;
                    self.step_started = now;
                    self.anchor = Some(motion.target());
                    self.enter(Phase::TakePictures);
                    None
                } else {
                    self.check_watchdog(now, motion)
                }
            }
            Phase::TakePictures => {
                if !motion.is_at_target() {
                    return self.check_watchdog(now, motion);
                }
                self.motion_since = None;

                let deadline = *self
                    .state
                    .phase_deadline
                    .get_or_insert(now + config.pre_shutter_wait());
                if now < deadline || shutter.is_busy() {
                    return None;
                }

                if let Err(e) = shutter.fire(now) {
                    error!("shutter release failed: {}", e);
                }
                self.state.shutters_fired_this_step += 1;

                if self.state.shutters_fired_this_step >= config.shutters_per_step() {
                    self.state.shutters_fired_this_step = 0;
                    self.enter(Phase::MoveRail);
                    self.state.phase_deadline = Some(now + config.post_shutter_wait());
                } else {
                    self.state.phase_deadline = Some(now + config.pre_shutter_wait());
                }

                Some(self.progress(now))
            }
            Phase::MoveRail => {
                let due = self.state.phase_deadline.map_or(true, |d| now >= d);
                if !due || shutter.is_busy() {
                    return None;
                }

                motion.move_by(config.step_delta());
                self.state.steps_taken += 1;
                self.motion_since = Some(now);
                trace!("step {} of {}", self.state.steps_taken, config.total_steps());

                if self.state.steps_taken >= config.total_steps() {
                    self.enter(Phase::StopStacking);
                } else {
                    self.step_started = now;
                    self.enter(Phase::TakePictures);
                }
                None
            }
            Phase::StopStacking => {
                // Let the last move land before heading back.
                if !motion.is_at_target() {
                    return self.check_watchdog(now, motion);
                }
                Some(self.finish(SessionOutcome::Completed, motion))
            }
        }
    }

    /// Periodic progress while a session runs.
    pub fn heartbeat(&mut self, now: Instant, interval: Duration) -> Option<StackingUpdate> {
        if !self.is_active() {
            return None;
        }

        let due = self
            .state
            .last_telemetry_sent
            .map_or(true, |sent| now.saturating_duration_since(sent) >= interval);
        due.then(|| self.progress(now))
    }

    fn enter(&mut self, phase: Phase) {
        debug!("stacking phase {} -> {}", self.state.phase, phase);
        self.state.phase = phase;
        self.state.phase_deadline = None;
    }

    fn progress(&mut self, now: Instant) -> StackingUpdate {
        self.state.last_telemetry_sent = Some(now);

        let elapsed = now.saturating_duration_since(self.step_started).as_millis();
        let (total_steps, step_size) = self
            .config
            .map_or((0, 0), |c| (c.total_steps(), c.step_size()));

        StackingUpdate::Progress(Progress {
            steps_taken: self.state.steps_taken,
            total_steps,
            step_size,
            elapsed_ms: u32::try_from(elapsed).unwrap_or(u32::MAX),
        })
    }

    fn check_watchdog<M: RailMotion>(
        &mut self,
        now: Instant,
        motion: &mut M,
    ) -> Option<StackingUpdate> {
        let (timeout, since) = (self.motion_timeout?, self.motion_since?);
        if now.saturating_duration_since(since) < timeout {
            return None;
        }

        let stall = MotionError::Stalled {
            position: motion.position().value(),
            target: motion.target().value(),
        };
        warn!("{}", stall);

        motion.stop();
        Some(self.finish(SessionOutcome::Stalled, motion))
    }

    /// Send the rail back to the anchor if requested, then go idle.
    fn finish<M: RailMotion>(&mut self, outcome: SessionOutcome, motion: &mut M) -> StackingUpdate {
        let steps_taken = self.state.steps_taken;
        let anchor = self.anchor.take();

        if let (Some(config), Some(anchor)) = (self.config.take(), anchor) {
            if outcome != SessionOutcome::Stalled && config.return_to_start() && steps_taken > 0 {
                debug!("returning to start position {}", anchor);
                motion.move_to(anchor);
            }
        }

        info!("stacking ended after {} steps: {}", steps_taken, outcome);

        self.state = SessionState::default();
        self.motion_since = None;
        self.move_issued = false;
        self.last_outcome = Some(outcome);

        StackingUpdate::Ended(outcome)
    }
}
