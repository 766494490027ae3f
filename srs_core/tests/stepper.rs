//! Shoulder and carousel stepper behavior against recording output banks.

use std::time::Duration;

use rstest::rstest;
use srs_core::config::{CarouselCfg, ShoulderCfg};
use srs_core::mocks::{FaultyBank, RecordingBank, SimClock};
use srs_core::sequence::{HALF_STEP_SEQUENCE, SEQUENCE_LEN};
use srs_core::{Actuation, CarouselStepper, PositionCommand, ShoulderStepper};

fn shoulder_cfg() -> ShoulderCfg {
    ShoulderCfg {
        persist: Duration::from_millis(10),
    }
}

fn carousel_cfg() -> CarouselCfg {
    CarouselCfg {
        step_angle_deg: 1.8,
        gripper_count: 20,
        persist: Duration::from_millis(10),
    }
}

#[test]
fn shoulder_advances_one_phase_per_max() {
    let mut bank = RecordingBank::new(4);
    let clock = SimClock::new();
    let mut shoulder = ShoulderStepper::new(&mut bank, shoulder_cfg(), clock);

    for _ in 0..4 {
        assert_eq!(
            shoulder.step(PositionCommand::Max).unwrap(),
            Actuation::Moved
        );
    }
    assert_eq!(shoulder.phase(), 4);

    // Each step drove exactly the row for the phase it started from.
    drop(shoulder);
    assert_eq!(bank.frames.len(), 4);
    for (i, frame) in bank.frames.iter().enumerate() {
        assert_eq!(frame[..], HALF_STEP_SEQUENCE[i][..]);
    }
    // One hold per step.
    assert_eq!(bank.lows, 4);
}

#[test]
fn shoulder_retreats_with_wraparound() {
    let mut bank = RecordingBank::new(4);
    let clock = SimClock::new();
    let mut shoulder = ShoulderStepper::new(&mut bank, shoulder_cfg(), clock);

    assert_eq!(shoulder.phase(), 0);
    shoulder.step(PositionCommand::Min).unwrap();
    assert_eq!(shoulder.phase(), SEQUENCE_LEN - 1);

    // The row asserted was the one for the pre-step phase.
    drop(shoulder);
    assert_eq!(bank.frames.len(), 1);
    assert_eq!(bank.frames[0][..], HALF_STEP_SEQUENCE[0][..]);
}

#[test]
fn shoulder_advance_wraps_to_zero() {
    let mut bank = RecordingBank::new(4);
    let mut shoulder = ShoulderStepper::new(&mut bank, shoulder_cfg(), SimClock::new());
    for _ in 0..SEQUENCE_LEN {
        shoulder.step(PositionCommand::Max).unwrap();
    }
    assert_eq!(shoulder.phase(), 0);
}

#[rstest]
#[case(PositionCommand::Mid)]
#[case(PositionCommand::Invalid)]
fn shoulder_holds_on_non_motion_trend(#[case] trend: PositionCommand) {
    let mut bank = RecordingBank::new(4);
    let mut shoulder = ShoulderStepper::new(&mut bank, shoulder_cfg(), SimClock::new());
    assert_eq!(shoulder.step(trend).unwrap(), Actuation::Held);
    assert_eq!(shoulder.phase(), 0);
    drop(shoulder);
    assert!(bank.frames.is_empty(), "hold must not drive any row");
    assert_eq!(bank.lows, 1);
}

#[test]
fn shoulder_persists_each_row_for_configured_time() {
    let mut bank = RecordingBank::new(4);
    let clock = SimClock::new();
    let mut shoulder = ShoulderStepper::new(&mut bank, shoulder_cfg(), clock.clone());
    shoulder.step(PositionCommand::Max).unwrap();
    shoulder.step(PositionCommand::Max).unwrap();
    assert_eq!(clock.elapsed(), Duration::from_millis(20));
}

#[test]
fn carousel_max_bursts_one_gripper_position() {
    let mut bank = RecordingBank::new(4);
    let clock = SimClock::new();
    let mut carousel = CarouselStepper::new(&mut bank, carousel_cfg(), clock.clone());

    // 360 deg / 20 grippers = 18 deg; at 0.9 deg per half-step that is 20
    // half-steps per advance.
    assert_eq!(carousel.steps_per_gripper(), 20);
    assert_eq!(carousel.step(PositionCommand::Max).unwrap(), Actuation::Moved);

    drop(carousel);
    assert_eq!(bank.frames.len(), 20);
    for (i, frame) in bank.frames.iter().enumerate() {
        assert_eq!(frame[..], HALF_STEP_SEQUENCE[i % SEQUENCE_LEN][..]);
    }
    // The burst is atomic: a single hold at the end, not one per half-step.
    assert_eq!(bank.lows, 1);
    assert_eq!(clock.elapsed(), Duration::from_millis(200));
}

#[test]
fn carousel_phase_continues_across_bursts() {
    let mut bank = RecordingBank::new(4);
    let mut carousel = CarouselStepper::new(&mut bank, carousel_cfg(), SimClock::new());
    carousel.step(PositionCommand::Max).unwrap();
    carousel.step(PositionCommand::Max).unwrap();
    drop(carousel);
    // 40 half-steps walk the 8-row table five times without resetting.
    assert_eq!(bank.frames.len(), 40);
    assert_eq!(bank.frames[20][..], HALF_STEP_SEQUENCE[20 % SEQUENCE_LEN][..]);
    assert_eq!(bank.frames[39][..], HALF_STEP_SEQUENCE[39 % SEQUENCE_LEN][..]);
}

#[rstest]
#[case(PositionCommand::Min)]
#[case(PositionCommand::Mid)]
#[case(PositionCommand::Invalid)]
fn carousel_only_rotates_forward(#[case] trend: PositionCommand) {
    let mut bank = RecordingBank::new(4);
    let mut carousel = CarouselStepper::new(&mut bank, carousel_cfg(), SimClock::new());
    assert_eq!(carousel.step(trend).unwrap(), Actuation::Held);
    drop(carousel);
    assert!(bank.frames.is_empty());
    assert_eq!(bank.lows, 1);
}

#[test]
fn shoulder_drive_fault_still_drops_windings() {
    let mut bank = FaultyBank::new(4, 0);
    let mut shoulder = ShoulderStepper::new(&mut bank, shoulder_cfg(), SimClock::new());
    assert!(shoulder.step(PositionCommand::Max).is_err());
    assert_eq!(shoulder.phase(), 0, "a failed step must not advance the phase");
    drop(shoulder);
    assert_eq!(bank.lows, 1, "a failed step must still force the windings low");
}

#[test]
fn carousel_mid_burst_fault_still_drops_windings() {
    // Five half-steps drive cleanly, the sixth faults partway into the burst.
    let mut bank = FaultyBank::new(4, 5);
    let mut carousel = CarouselStepper::new(&mut bank, carousel_cfg(), SimClock::new());
    assert!(carousel.step(PositionCommand::Max).is_err());
    drop(carousel);
    assert_eq!(bank.lows, 1, "a faulted burst must still force the windings low");
}

#[rstest]
#[case(1.8, 20, 20)]
#[case(1.8, 8, 50)]
#[case(3.6, 20, 10)]
fn steps_per_gripper_from_geometry(
    #[case] step_angle_deg: f64,
    #[case] gripper_count: u32,
    #[case] expect: usize,
) {
    let cfg = CarouselCfg {
        step_angle_deg,
        gripper_count,
        persist: Duration::from_millis(10),
    };
    let mut bank = RecordingBank::new(4);
    let carousel = CarouselStepper::new(&mut bank, cfg, SimClock::new());
    assert_eq!(carousel.steps_per_gripper(), expect);
}
