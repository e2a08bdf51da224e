//! Tick scheduler.
//!
//! [`RailController`] owns the rail, the shutter, the jog state and the
//! stacking session, and is the only place any of them change. The firmware
//! main loop calls [`tick`](RailController::tick) once per iteration with the
//! current time and whatever command the radio left in the
//! [`CommandSlot`](crate::command::CommandSlot).
//!
//! Each tick:
//! 1. dispatches the pending command, if any;
//! 2. clamps the rail target into the travel bound;
//! 3. advances the rail and the shutter pulse;
//! 4. advances the stacking session by one phase evaluation;
//! 5. publishes session updates and position telemetry.

use core::time::Duration;

use crate::command::{Command, Inbound};
use crate::config::units::{Instant, Steps};
use crate::config::{validate_config, RailConfig, TravelLimits};
use crate::error::Result;
use crate::jog::{JogController, JogState};
use crate::motor::RailMotion;
use crate::shutter::Shutter;
use crate::stacking::{Phase, SessionConfig, StackingSession};
use crate::telemetry::{StackingUpdate, TelemetryFrame, TelemetrySink};

/// Cooperative controller of one camera rail.
///
/// # Example
///
/// ```rust,ignore
/// static COMMANDS: CommandSlot<CriticalSectionRawMutex> = CommandSlot::new();
///
/// let mut controller = RailController::new(rail, shutter, notifier, &config)?;
/// loop {
///     controller.tick(clock.now(), COMMANDS.take());
/// }
/// ```
pub struct RailController<M, S, T>
where
    M: RailMotion,
    S: Shutter,
    T: TelemetrySink,
{
    motion: M,
    shutter: S,
    telemetry: T,
    limits: TravelLimits,
    session: StackingSession,
    jog: JogController,
    position_interval: Duration,
    progress_interval: Option<Duration>,
    /// Last published position and when it was sent.
    last_position: Option<(Steps, Instant)>,
}

impl<M, S, T> RailController<M, S, T>
where
    M: RailMotion,
    S: Shutter,
    T: TelemetrySink,
{
    /// Create a controller from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(motion: M, shutter: S, telemetry: T, config: &RailConfig) -> Result<Self> {
        validate_config(config)?;

        let limits = config.travel_limits();
        info!("rail controller ready, travel 0..{}", limits.max());

        Ok(Self {
            motion,
            shutter,
            telemetry,
            limits,
            session: StackingSession::new(limits, config.motion_timeout()),
            jog: JogController::new(limits),
            position_interval: config.position_interval(),
            progress_interval: config.progress_interval(),
            last_position: None,
        })
    }

    /// Run one cooperative iteration.
    pub fn tick(&mut self, now: Instant, inbound: Option<Inbound>) {
        if let Some(inbound) = inbound {
            trace!("command on {}", inbound.endpoint());
            match inbound.parse() {
                Ok(Some(command)) => self.dispatch(command, now),
                Ok(None) => {}
                Err(e) => warn!(
                    "dropped command \"{}\" on {}: {}",
                    inbound.payload(),
                    inbound.endpoint(),
                    e
                ),
            }
        }

        let target = self.motion.target();
        let clamped = self.limits.clamp(target);
        if clamped != target {
            trace!("target {} clamped to {}", target, clamped);
            self.motion.move_to(clamped);
        }

        if let Err(e) = self.motion.poll(now) {
            error!("rail: {}", e);
        }
        if let Err(e) = self.shutter.poll(now) {
            error!("shutter: {}", e);
        }
        self.jog.poll(&self.motion);

        if let Some(update) = self
            .session
            .advance(now, &mut self.motion, &mut self.shutter)
        {
            self.publish_stacking(update);
        }
        if let Some(interval) = self.progress_interval {
            if let Some(update) = self.session.heartbeat(now, interval) {
                self.publish_stacking(update);
            }
        }

        self.publish_position(now);
    }

    /// Apply one decoded command.
    ///
    /// Jogs cancel a running session. Starting a session halts a continuous
    /// jog. Stopping a continuous jog and releasing the shutter by hand are
    /// ignored while a session owns the rail.
    pub fn dispatch(&mut self, command: Command, now: Instant) {
        if command.is_jog() {
            self.cancel_session();
        }

        match command {
            Command::StepMove { direction, count } => {
                self.jog.step(&mut self.motion, direction, count);
            }
            Command::ContinuousMove { direction } => {
                self.jog.start_continuous(&mut self.motion, direction);
            }
            Command::StopContinuous => {
                if self.session.is_active() {
                    debug!("continuous stop ignored during stacking");
                } else {
                    self.jog.stop_continuous(&mut self.motion);
                }
            }
            Command::StartStacking(request) => match SessionConfig::try_from(request) {
                Ok(config) => {
                    self.jog.halt(&mut self.motion);
                    if let Some(update) = self.session.start(config, now, &mut self.motion) {
                        self.publish_stacking(update);
                    }
                }
                Err(e) => warn!("stacking not started: {}", e),
            },
            Command::StopStacking => self.cancel_session(),
            Command::ReleaseShutter => {
                if self.session.is_active() {
                    debug!("manual release ignored during stacking");
                } else if let Err(e) = self.shutter.fire(now) {
                    error!("shutter: {}", e);
                }
            }
        }
    }

    /// Rail being driven.
    #[inline]
    pub fn motion(&self) -> &M {
        &self.motion
    }

    /// Mutable access to the rail, e.g. to re-home it.
    #[inline]
    pub fn motion_mut(&mut self) -> &mut M {
        &mut self.motion
    }

    /// Camera trigger.
    #[inline]
    pub fn shutter(&self) -> &S {
        &self.shutter
    }

    /// Telemetry sink.
    #[inline]
    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Mutable access to the telemetry sink.
    #[inline]
    pub fn telemetry_mut(&mut self) -> &mut T {
        &mut self.telemetry
    }

    /// Stacking session owner.
    #[inline]
    pub fn session(&self) -> &StackingSession {
        &self.session
    }

    /// Current stacking phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Continuous jog state.
    #[inline]
    pub fn jog_state(&self) -> &JogState {
        self.jog.state()
    }

    /// Travel bound.
    #[inline]
    pub fn limits(&self) -> TravelLimits {
        self.limits
    }

    /// Release the hardware.
    pub fn release(self) -> (M, S, T) {
        (self.motion, self.shutter, self.telemetry)
    }

    fn cancel_session(&mut self) {
        if let Some(update) = self.session.cancel(&mut self.motion) {
            self.publish_stacking(update);
        }
    }

    fn publish_stacking(&mut self, update: StackingUpdate) {
        self.telemetry.publish(&TelemetryFrame::Stacking(update));
    }

    fn publish_position(&mut self, now: Instant) {
        let position = self.motion.position();

        let due = match self.last_position {
            None => true,
            Some((sent, at)) => {
                sent != position && now.saturating_duration_since(at) >= self.position_interval
            }
        };
        if due {
            self.telemetry.publish(&TelemetryFrame::Position(position));
            self.last_position = Some((position, now));
        }
    }
}
