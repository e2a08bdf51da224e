//! Per-endpoint grammars.

use crate::error::ParseError;
use crate::motion::Direction;

use super::fields::parse_fields;
use super::Command;

/// Length of every opcode and field ID.
pub(super) const ID_LEN: usize = 3;

/// Split off the fixed-width opcode.
pub(super) fn split_id(raw: &str) -> Option<(&str, &str)> {
    if raw.len() < ID_LEN || !raw.is_char_boundary(ID_LEN) {
        return None;
    }
    Some(raw.split_at(ID_LEN))
}

pub(super) fn step(raw: &str) -> Result<Command, ParseError> {
    let (opcode, operand) = split_id(raw).ok_or(ParseError::UnknownOpcode)?;
    let direction = Direction::from_wire(opcode).ok_or(ParseError::UnknownOpcode)?;

    let count: u32 = operand
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidOperand)?;
    if count == 0 {
        return Err(ParseError::InvalidOperand);
    }

    Ok(Command::StepMove { direction, count })
}

pub(super) fn continuous(raw: &str) -> Result<Command, ParseError> {
    let (opcode, operand) = split_id(raw).ok_or(ParseError::UnknownOpcode)?;

    // The stop token wins over the opcode.
    if operand == "false" {
        return Ok(Command::StopContinuous);
    }

    let direction = Direction::from_wire(opcode).ok_or(ParseError::UnknownOpcode)?;
    Ok(Command::ContinuousMove { direction })
}

pub(super) fn stacking(raw: &str) -> Command {
    match raw {
        "STOP" | "Stop" => Command::StopStacking,
        _ => Command::StartStacking(parse_fields(raw)),
    }
}
