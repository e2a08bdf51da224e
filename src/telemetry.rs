//! Outbound status frames.
//!
//! Two text channels: the rail position as a decimal number, and stacking
//! progress as `stepsTaken;totalSteps;stepSize;elapsedMs`. An empty stacking
//! frame means no session is running.

use core::fmt::Write;

use crate::config::units::Steps;
use crate::stacking::SessionOutcome;

/// Capacity of an encoded frame.
pub const FRAME_CAPACITY: usize = 48;

/// Progress of the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Progress {
    /// Rail moves made so far.
    pub steps_taken: u32,
    /// Rail moves requested.
    pub total_steps: u32,
    /// Steps per rail move.
    pub step_size: u32,
    /// Time spent at the current rail position.
    pub elapsed_ms: u32,
}

/// Update produced by a stacking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackingUpdate {
    /// Session still running.
    Progress(Progress),
    /// Session over; sent once per session.
    Ended(SessionOutcome),
}

/// One outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryFrame {
    /// Current rail position.
    Position(Steps),
    /// Stacking progress or end marker.
    Stacking(StackingUpdate),
}

impl TelemetryFrame {
    /// Wire text of this frame.
    pub fn encode(&self) -> heapless::String<FRAME_CAPACITY> {
        let mut out = heapless::String::new();

        let written = match self {
            TelemetryFrame::Position(position) => write!(out, "{}", position.value()),
            TelemetryFrame::Stacking(StackingUpdate::Progress(p)) => write!(
                out,
                "{};{};{};{}",
                p.steps_taken, p.total_steps, p.step_size, p.elapsed_ms
            ),
            TelemetryFrame::Stacking(StackingUpdate::Ended(_)) => Ok(()),
        };
        if written.is_err() {
            error!("telemetry frame over {} bytes", FRAME_CAPACITY);
            out.clear();
        }

        out
    }

    /// Whether this frame belongs on the stacking channel.
    pub fn is_stacking(&self) -> bool {
        matches!(self, TelemetryFrame::Stacking(_))
    }
}

/// Destination of telemetry frames, e.g. a BLE notify characteristic.
pub trait TelemetrySink {
    /// Send one frame. Must not block the tick.
    fn publish(&mut self, frame: &TelemetryFrame);
}
