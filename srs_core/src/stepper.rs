//! Carousel and shoulder stepper controllers.
//!
//! Both walk the shared half-step sequence table. One step asserts the
//! current row on the four phase outputs, holds it for the driver's minimum
//! persist time, then drops the outputs low again, so every call ends in the
//! defined hold state.

use eyre::WrapErr;
use srs_traits::{Clock, OutputBank};

use crate::command::PositionCommand;
use crate::config::{CarouselCfg, ShoulderCfg};
use crate::error::Result;
use crate::hw_error::map_hw_error;
use crate::pipeline::{Actuation, ActuatorController};
use crate::sequence::{HALF_STEP_SEQUENCE, SEQUENCE_LEN};

fn assert_row<O: OutputBank>(
    outputs: &mut O,
    phase: usize,
    which: &'static str,
) -> Result<()> {
    outputs
        .apply(&HALF_STEP_SEQUENCE[phase % SEQUENCE_LEN])
        .map_err(|e| eyre::Report::new(map_hw_error(&*e, which)))
        .wrap_err("driving stepper phase outputs")
}

fn all_low<O: OutputBank>(outputs: &mut O, which: &'static str) -> Result<()> {
    outputs
        .set_all_low()
        .map_err(|e| eyre::Report::new(map_hw_error(&*e, which)))
        .wrap_err("forcing stepper outputs low")
}

/// Shoulder stepper: one half-step per poll cycle, bidirectional.
///
/// The phase index persists across calls so continued rotation walks the
/// sequence in order; it wraps modulo the table length in both directions.
pub struct ShoulderStepper<O, C> {
    outputs: O,
    cfg: ShoulderCfg,
    clock: C,
    phase: usize,
}

impl<O: OutputBank, C: Clock> ShoulderStepper<O, C> {
    pub fn new(outputs: O, cfg: ShoulderCfg, clock: C) -> Self {
        Self {
            outputs,
            cfg,
            clock,
            phase: 0,
        }
    }

    /// Current index into the half-step sequence table.
    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Enact one debounced command: `Max` steps clockwise (tilt down), `Min`
    /// counter-clockwise (tilt up), anything else holds.
    ///
    /// The windings are forced low before returning, even when driving a
    /// phase row fails partway.
    pub fn step(&mut self, trend: PositionCommand) -> Result<Actuation> {
        let moved = self.step_inner(trend);
        let hold = all_low(&mut self.outputs, "shoulder outputs");
        let moved = moved?;
        hold?;
        Ok(moved)
    }

    fn step_inner(&mut self, trend: PositionCommand) -> Result<Actuation> {
        match trend {
            PositionCommand::Max | PositionCommand::Min => {
                assert_row(&mut self.outputs, self.phase, "shoulder outputs")?;
                self.clock.sleep(self.cfg.persist);
                self.phase = if trend == PositionCommand::Max {
                    (self.phase + 1) % SEQUENCE_LEN
                } else {
                    (self.phase + SEQUENCE_LEN - 1) % SEQUENCE_LEN
                };
                tracing::trace!(phase = self.phase, trend = %trend, "shoulder stepped");
                Ok(Actuation::Moved)
            }
            PositionCommand::Mid | PositionCommand::Invalid => Ok(Actuation::Held),
        }
    }
}

impl<O: OutputBank, C: Clock> ActuatorController for ShoulderStepper<O, C> {
    fn actuate(&mut self, trend: PositionCommand) -> Result<Actuation> {
        self.step(trend)
    }

    fn label(&self) -> &'static str {
        "shoulder"
    }
}

/// Carousel stepper: advances exactly one gripper position per `Max` trend,
/// as one atomic blocking burst of half-steps. The mechanism only rotates one
/// way, so `Min` holds like `Mid`.
pub struct CarouselStepper<O, C> {
    outputs: O,
    cfg: CarouselCfg,
    clock: C,
    phase: usize,
}

impl<O: OutputBank, C: Clock> CarouselStepper<O, C> {
    pub fn new(outputs: O, cfg: CarouselCfg, clock: C) -> Self {
        Self {
            outputs,
            cfg,
            clock,
            phase: 0,
        }
    }

    /// Half-steps needed to rotate one gripper position, from the mechanical
    /// step angle and the gripper count.
    pub fn steps_per_gripper(&self) -> usize {
        let circle_fraction = 1.0 / f64::from(self.cfg.gripper_count);
        let half_step_deg = self.cfg.step_angle_deg / 2.0;
        ((circle_fraction * 360.0) / half_step_deg).round() as usize
    }

    /// The windings are forced low before returning, even when the burst
    /// faults partway through.
    pub fn step(&mut self, trend: PositionCommand) -> Result<Actuation> {
        let moved = self.step_inner(trend);
        let hold = all_low(&mut self.outputs, "carousel outputs");
        let moved = moved?;
        hold?;
        Ok(moved)
    }

    fn step_inner(&mut self, trend: PositionCommand) -> Result<Actuation> {
        match trend {
            PositionCommand::Max => {
                let burst = self.steps_per_gripper();
                tracing::debug!(burst, "carousel advancing one gripper position");
                for _ in 0..burst {
                    assert_row(&mut self.outputs, self.phase, "carousel outputs")?;
                    self.clock.sleep(self.cfg.persist);
                    self.phase = (self.phase + 1) % SEQUENCE_LEN;
                }
                Ok(Actuation::Moved)
            }
            PositionCommand::Min | PositionCommand::Mid | PositionCommand::Invalid => {
                Ok(Actuation::Held)
            }
        }
    }
}

impl<O: OutputBank, C: Clock> ActuatorController for CarouselStepper<O, C> {
    fn actuate(&mut self, trend: PositionCommand) -> Result<Actuation> {
        self.step(trend)
    }

    fn label(&self) -> &'static str {
        "carousel"
    }
}
