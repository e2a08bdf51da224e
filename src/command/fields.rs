//! Stacking field list: `ID+value` entries separated by `;`.
//!
//! Decoding is tolerant. An unknown ID, a malformed value, or a zero is
//! skipped and leaves its slot unset; the completeness check happens later
//! when the request is turned into a session.

use crate::config::units::Steps;
use crate::motion::Direction;
use crate::stacking::SessionRequest;

use super::parser::split_id;

/// Wait values arrive in whole seconds.
const MS_PER_SECOND: u32 = 1_000;

pub(super) fn parse_fields(raw: &str) -> SessionRequest {
    let mut request = SessionRequest::default();

    for field in raw.split(';') {
        let Some((id, value)) = split_id(field) else {
            continue;
        };

        match id {
            "PRE" => {
                if let Some(ms) = seconds_to_ms(value) {
                    request.pre_shutter_wait_ms = Some(ms);
                }
            }
            "PST" => {
                if let Some(ms) = seconds_to_ms(value) {
                    request.post_shutter_wait_ms = Some(ms);
                }
            }
            "STP" => {
                if let Some(n) = positive(value) {
                    request.shutters_per_step = Some(n);
                }
            }
            "STS" => {
                if let Some(n) = positive(value) {
                    request.step_size = Some(n);
                }
            }
            "DIR" => {
                if let Some(direction) = Direction::from_wire(value) {
                    request.direction = Some(direction);
                }
            }
            "SPS" => {
                let position = leading_int(value);
                if position != 0 {
                    request.start_position = Some(Steps(position));
                }
            }
            "NST" => {
                if let Some(n) = positive(value) {
                    request.total_steps = Some(n);
                }
            }
            "RTS" => match value {
                "true" => request.return_to_start = Some(true),
                "false" => request.return_to_start = Some(false),
                _ => {}
            },
            _ => {
                trace!("skipping unknown stacking field");
            }
        }
    }

    request
}

/// Integer conversion in the style of C `atol`: optional leading whitespace
/// and sign, then digits up to the first non-digit. No digits yields 0.
fn leading_int(value: &str) -> i64 {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut result: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        result = result.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    if negative {
        -result
    } else {
        result
    }
}

/// A strictly positive count; zero or negative means "not provided".
fn positive(value: &str) -> Option<u32> {
    let n = leading_int(value);
    if n > 0 {
        Some(u32::try_from(n).unwrap_or(u32::MAX))
    } else {
        None
    }
}

fn seconds_to_ms(value: &str) -> Option<u32> {
    positive(value).map(|s| s.saturating_mul(MS_PER_SECOND))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_field_list() {
        let request = parse_fields("PRE2;PST3;STP1;STS100;DIRFWD;NST5;RTStrue");

        assert_eq!(request.pre_shutter_wait_ms, Some(2_000));
        assert_eq!(request.post_shutter_wait_ms, Some(3_000));
        assert_eq!(request.shutters_per_step, Some(1));
        assert_eq!(request.step_size, Some(100));
        assert_eq!(request.direction, Some(Direction::Forward));
        assert_eq!(request.start_position, None);
        assert_eq!(request.total_steps, Some(5));
        assert_eq!(request.return_to_start, Some(true));
    }

    #[test]
    fn test_unknown_and_short_fields_are_skipped() {
        let request = parse_fields("XYZ9;;ST;STS40;SPS1200");

        assert_eq!(request.step_size, Some(40));
        assert_eq!(request.start_position, Some(Steps(1200)));
        assert_eq!(request.total_steps, None);
    }

    #[test]
    fn test_zero_means_not_provided() {
        let request = parse_fields("STS50;STS0;NST0;PRE0");

        // A later zero does not clear an earlier value.
        assert_eq!(request.step_size, Some(50));
        assert_eq!(request.total_steps, None);
        assert_eq!(request.pre_shutter_wait_ms, None);
    }

    #[test]
    fn test_invalid_enumerations_stay_unset() {
        let request = parse_fields("DIRUP;RTSyes");

        assert_eq!(request.direction, None);
        assert_eq!(request.return_to_start, None);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("42"), 42);
        assert_eq!(leading_int("  17abc"), 17);
        assert_eq!(leading_int("-8"), -8);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int(""), 0);
        assert_eq!(leading_int("-"), 0);
    }
}
