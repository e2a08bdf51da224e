//! Unit tests for command decoding.

use proptest::prelude::*;

use stacking_rail::error::{ParseError, SessionError, SessionField};
use stacking_rail::{Command, Direction, Endpoint, SessionConfig, Steps};

fn start(raw: &str) -> stacking_rail::SessionRequest {
    match Command::parse(Endpoint::Stacking, raw) {
        Ok(Some(Command::StartStacking(request))) => request,
        other => panic!("expected StartStacking, got {other:?}"),
    }
}

/// Test the documented stacking command decodes field by field.
#[test]
fn test_stacking_scenario() {
    let config =
        SessionConfig::try_from(start("PRE2;PST3;STP1;STS100;DIRFWD;NST5;RTStrue")).unwrap();

    assert_eq!(config.pre_shutter_wait().as_millis(), 2_000);
    assert_eq!(config.post_shutter_wait().as_millis(), 3_000);
    assert_eq!(config.shutters_per_step(), 1);
    assert_eq!(config.step_size(), 100);
    assert_eq!(config.direction(), Direction::Forward);
    assert_eq!(config.start_position(), None);
    assert_eq!(config.total_steps(), 5);
    assert!(config.return_to_start());
}

/// Test that field order does not matter and SPS is optional.
#[test]
fn test_field_order_and_start_position() {
    let config =
        SessionConfig::try_from(start("RTSfalse;SPS4200;NST3;DIRBCK;STS25;STP2;PST1;PRE4"))
            .unwrap();

    assert_eq!(config.start_position(), Some(Steps(4_200)));
    assert_eq!(config.direction(), Direction::Backward);
    assert_eq!(config.step_delta(), -25);
    assert!(!config.return_to_start());
}

/// Test that a bad field is skipped without failing the command.
#[test]
fn test_bad_field_is_skipped() {
    let request = start("PRE2;PST3;XYZ7;STP1;STS100;DIRUP;NST5;RTStrue");

    assert_eq!(request.direction, None);
    assert_eq!(request.total_steps, Some(5));
    assert_eq!(
        SessionConfig::try_from(request),
        Err(SessionError::ConfigIncomplete(SessionField::Direction))
    );
}

/// Test that zero counts as not provided.
#[test]
fn test_zero_field_is_incomplete() {
    let request = start("PRE2;PST3;STP1;STS0;DIRFWD;NST5;RTStrue");

    assert_eq!(
        SessionConfig::try_from(request),
        Err(SessionError::ConfigIncomplete(SessionField::StepSize))
    );
}

/// Test that RTS accepts only the two literals.
#[test]
fn test_return_flag_literals() {
    assert_eq!(start("RTStrue").return_to_start, Some(true));
    assert_eq!(start("RTSfalse").return_to_start, Some(false));
    assert_eq!(start("RTSTrue").return_to_start, None);
    assert_eq!(start("RTS1").return_to_start, None);
}

/// Test the stop token in its accepted spellings.
#[test]
fn test_stop_token() {
    for raw in ["STOP", "Stop"] {
        assert_eq!(
            Command::parse(Endpoint::Stacking, raw),
            Ok(Some(Command::StopStacking))
        );
    }

    // Anything else is read as (empty) stacking fields.
    for raw in ["stop", "STOP "] {
        assert!(matches!(
            Command::parse(Endpoint::Stacking, raw),
            Ok(Some(Command::StartStacking(_)))
        ));
    }
}

/// Test jog commands per endpoint.
#[test]
fn test_jog_commands() {
    assert_eq!(
        Command::parse(Endpoint::Step, "FWD1500"),
        Ok(Some(Command::StepMove {
            direction: Direction::Forward,
            count: 1_500
        }))
    );
    assert_eq!(
        Command::parse(Endpoint::Step, "BCK20"),
        Ok(Some(Command::StepMove {
            direction: Direction::Backward,
            count: 20
        }))
    );
    assert_eq!(
        Command::parse(Endpoint::Continuous, "BCKtrue"),
        Ok(Some(Command::ContinuousMove {
            direction: Direction::Backward
        }))
    );
    assert_eq!(
        Command::parse(Endpoint::Continuous, "FWDfalse"),
        Ok(Some(Command::StopContinuous))
    );
    assert_eq!(
        Command::parse(Endpoint::Shutter, "go"),
        Ok(Some(Command::ReleaseShutter))
    );
}

/// Test that the same text means different things on different endpoints.
#[test]
fn test_endpoint_selects_grammar() {
    assert_eq!(
        Command::parse(Endpoint::Step, "STOP"),
        Err(ParseError::UnknownOpcode)
    );
    assert!(matches!(
        Command::parse(Endpoint::Stacking, "FWD100"),
        Ok(Some(Command::StartStacking(_)))
    ));
}

/// Test that empty input yields no command on every endpoint.
#[test]
fn test_empty_input_is_noop() {
    for endpoint in [
        Endpoint::Step,
        Endpoint::Continuous,
        Endpoint::Stacking,
        Endpoint::Shutter,
    ] {
        assert_eq!(Command::parse(endpoint, ""), Ok(None));
    }
}

/// Test which commands count as jogs.
#[test]
fn test_is_jog() {
    assert!(Command::StepMove {
        direction: Direction::Forward,
        count: 1
    }
    .is_jog());
    assert!(Command::ContinuousMove {
        direction: Direction::Forward
    }
    .is_jog());
    assert!(!Command::StopContinuous.is_jog());
    assert!(!Command::StopStacking.is_jog());
    assert!(!Command::ReleaseShutter.is_jog());
}

proptest! {
    #[test]
    fn prop_parse_never_panics(raw in ".{0,80}") {
        for endpoint in [
            Endpoint::Step,
            Endpoint::Continuous,
            Endpoint::Stacking,
            Endpoint::Shutter,
        ] {
            let _ = Command::parse(endpoint, &raw);
        }
    }

    #[test]
    fn prop_step_count_decodes(count in 1u32..=u32::MAX, forward in any::<bool>()) {
        let (opcode, direction) = if forward {
            ("FWD", Direction::Forward)
        } else {
            ("BCK", Direction::Backward)
        };
        let raw = format!("{opcode}{count}");

        prop_assert_eq!(
            Command::parse(Endpoint::Step, &raw),
            Ok(Some(Command::StepMove { direction, count }))
        );
    }

    #[test]
    fn prop_complete_fields_always_start(
        pre in 1u32..60,
        post in 1u32..60,
        shots in 1u32..10,
        size in 1u32..100_000,
        total in 1u32..1_000,
        rts in any::<bool>(),
    ) {
        let raw = format!("PRE{pre};PST{post};STP{shots};STS{size};DIRFWD;NST{total};RTS{rts}");
        let config = SessionConfig::try_from(start(&raw)).unwrap();

        prop_assert_eq!(config.step_size(), size);
        prop_assert_eq!(config.total_steps(), total);
        prop_assert_eq!(config.return_to_start(), rts);
    }
}
