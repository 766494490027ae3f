//! Linear actuator travel, stop behavior, and hold-state guarantees.

use std::time::Duration;

use rstest::rstest;
use srs_core::config::{LinearCfg, StopMode};
use srs_core::mocks::{RecordingBank, ScriptedAnalog, SimClock};
use srs_core::sequence::{LA_EXTEND, LA_RETRACT};
use srs_core::{Actuation, LinearActuator, PositionCommand, SrsError};

fn timed_cfg() -> LinearCfg {
    LinearCfg {
        stroke_time: Duration::from_millis(1_600),
        stroke_fraction: 0.625,
        stop: StopMode::Timed,
        feedback_poll: Duration::from_millis(5),
        feedback_timeout: Duration::from_millis(4_000),
    }
}

fn feedback_cfg() -> LinearCfg {
    LinearCfg {
        stop: StopMode::Feedback,
        ..timed_cfg()
    }
}

#[test]
fn timed_retract_runs_for_scaled_stroke_time() {
    let mut bank = RecordingBank::new(2);
    let mut analog = ScriptedAnalog::new(vec![0.5]);
    let clock = SimClock::new();
    let mut la = LinearActuator::new(&mut bank, &mut analog, timed_cfg(), clock.clone());

    assert_eq!(la.drive(PositionCommand::Max).unwrap(), Actuation::Moved);

    // 1.25 in of a 2 in stroke: 1.6 s * 0.625 = 1.0 s.
    assert_eq!(clock.elapsed(), Duration::from_millis(1_000));
    drop(la);
    assert_eq!(bank.frames.len(), 1);
    assert_eq!(bank.frames[0][..], LA_RETRACT[..]);
    assert_eq!(bank.lows, 1, "travel must end in the hold state");
    assert_eq!(analog.reads(), 0, "timed stop never touches the pot");
}

#[test]
fn timed_extend_runs_the_full_stroke() {
    let mut bank = RecordingBank::new(2);
    let mut analog = ScriptedAnalog::new(vec![0.5]);
    let clock = SimClock::new();
    let mut la = LinearActuator::new(&mut bank, &mut analog, timed_cfg(), clock.clone());

    assert_eq!(la.drive(PositionCommand::Min).unwrap(), Actuation::Moved);

    // Extension always closes fully, so the whole stroke time elapses.
    assert_eq!(clock.elapsed(), Duration::from_millis(1_600));
    drop(la);
    assert_eq!(bank.frames[0][..], LA_EXTEND[..]);
    assert_eq!(bank.lows, 1);
}

#[rstest]
#[case(PositionCommand::Mid)]
#[case(PositionCommand::Invalid)]
fn hold_trend_only_forces_outputs_low(#[case] trend: PositionCommand) {
    let mut bank = RecordingBank::new(2);
    let mut analog = ScriptedAnalog::new(vec![0.5]);
    let clock = SimClock::new();
    let mut la = LinearActuator::new(&mut bank, &mut analog, timed_cfg(), clock.clone());

    assert_eq!(la.drive(trend).unwrap(), Actuation::Held);

    assert_eq!(clock.elapsed(), Duration::ZERO);
    drop(la);
    assert!(bank.frames.is_empty(), "hold must not drive a direction");
    assert_eq!(bank.lows, 1);
}

#[test]
fn feedback_extend_stops_at_full_extension() {
    let mut bank = RecordingBank::new(2);
    // Pairs of (stale, fresh) reads; travel ends when the fresh read
    // reaches 1.0.
    let mut analog = ScriptedAnalog::new(vec![0.5, 0.6, 0.7, 0.8, 0.9, 1.0]);
    let clock = SimClock::new();
    let mut la = LinearActuator::new(&mut bank, &mut analog, feedback_cfg(), clock.clone());

    assert_eq!(la.drive(PositionCommand::Min).unwrap(), Actuation::Moved);

    drop(la);
    assert_eq!(bank.frames[0][..], LA_EXTEND[..]);
    assert_eq!(bank.lows, 1);
    // Two poll rounds before the terminating one: 2 * 5 ms of polling.
    assert_eq!(clock.elapsed(), Duration::from_millis(10));
    // Every round reads twice, discarding the stale conversion.
    assert_eq!(analog.reads(), 6);
}

#[test]
fn feedback_retract_stops_at_lower_bound() {
    let mut bank = RecordingBank::new(2);
    // Lower bound is 1.0 - 0.625 = 0.375; the fresh 0.3 read terminates.
    let mut analog = ScriptedAnalog::new(vec![1.0, 0.9, 0.6, 0.5, 0.4, 0.3]);
    let clock = SimClock::new();
    let mut la = LinearActuator::new(&mut bank, &mut analog, feedback_cfg(), clock.clone());

    assert_eq!(la.drive(PositionCommand::Max).unwrap(), Actuation::Moved);

    drop(la);
    assert_eq!(bank.frames[0][..], LA_RETRACT[..]);
    assert_eq!(analog.reads(), 6);
}

#[test]
fn feedback_stall_times_out_with_outputs_low() {
    let mut bank = RecordingBank::new(2);
    // The pot never moves, so the deadline expires.
    let mut analog = ScriptedAnalog::new(vec![0.5]);
    let clock = SimClock::new();
    let mut la = LinearActuator::new(&mut bank, &mut analog, feedback_cfg(), clock.clone());

    let err = la.drive(PositionCommand::Min).unwrap_err();
    assert!(
        err.chain()
            .any(|c| matches!(c.downcast_ref::<SrsError>(), Some(SrsError::SensorStall(_)))),
        "expected a sensor stall, got: {err:#}"
    );

    drop(la);
    assert_eq!(
        bank.lows, 1,
        "outputs must be forced low even when the travel fails"
    );
    assert!(clock.elapsed() >= Duration::from_millis(4_000));
}
