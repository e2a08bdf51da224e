//! Inbound command decoding.
//!
//! Each command arrives as text on one of four endpoints. The endpoint picks
//! the grammar; the text is decoded into a [`Command`] in one step, and
//! anything malformed degrades to a dropped command.

mod fields;
mod parser;
mod slot;

pub use slot::{CommandSlot, Inbound, PAYLOAD_CAPACITY};

use crate::error::ParseError;
use crate::motion::Direction;
use crate::stacking::SessionRequest;

/// Where a command was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endpoint {
    /// Finite jog: `FWD<count>` / `BCK<count>`.
    Step,
    /// Continuous jog: `FWD…` / `BCK…`, or any opcode with operand `false` to stop.
    Continuous,
    /// Stacking: `STOP`, or the `;`-separated field list.
    Stacking,
    /// Manual shutter release: any non-empty payload.
    Shutter,
}

/// A decoded command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move `count` steps relative to the current target.
    StepMove {
        /// Travel direction
        direction: Direction,
        /// Number of steps
        count: u32,
    },
    /// Run toward the end of travel in `direction`.
    ContinuousMove {
        /// Travel direction
        direction: Direction,
    },
    /// Halt a continuous move.
    StopContinuous,
    /// Start a stacking session. Not yet checked for completeness.
    StartStacking(SessionRequest),
    /// Cancel the active stacking session.
    StopStacking,
    /// Fire the shutter once.
    ReleaseShutter,
}

impl Command {
    /// Decode `raw` as received on `endpoint`.
    ///
    /// Returns `Ok(None)` for an empty payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the opcode or operand is malformed. Stacking
    /// commands never fail: unknown fields are skipped.
    pub fn parse(endpoint: Endpoint, raw: &str) -> Result<Option<Command>, ParseError> {
        if raw.is_empty() {
            return Ok(None);
        }

        let command = match endpoint {
            Endpoint::Step => parser::step(raw)?,
            Endpoint::Continuous => parser::continuous(raw)?,
            Endpoint::Stacking => parser::stacking(raw),
            Endpoint::Shutter => Command::ReleaseShutter,
        };

        Ok(Some(command))
    }

    /// Whether this command takes the rail away from a stacking session.
    pub fn is_jog(&self) -> bool {
        matches!(
            self,
            Command::StepMove { .. } | Command::ContinuousMove { .. }
        )
    }
}
