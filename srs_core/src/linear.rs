//! Linear actuator (gripper) controller.
//!
//! `Max` retracts (opens the gripper), `Min` extends (closes it), anything
//! else holds. A travel ends either after a fixed time derived from the
//! full-stroke time or once the potentiometer feedback crosses the target
//! bound. Whatever happens, both direction outputs are forced low before the
//! call returns so no residual drive signal remains.

use std::time::Duration;

use eyre::WrapErr;
use srs_traits::{AnalogInput, Clock, OutputBank};

use crate::command::PositionCommand;
use crate::config::{LinearCfg, StopMode};
use crate::error::{Result, SrsError};
use crate::hw_error::map_hw_error;
use crate::pipeline::{Actuation, ActuatorController};
use crate::sequence::{LA_EXTEND, LA_RETRACT};

/// Normalized potentiometer reading at full extension.
const UPPER_LIMIT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Travel {
    Extend,
    Retract,
}

pub struct LinearActuator<O, F, C> {
    outputs: O,
    feedback: F,
    cfg: LinearCfg,
    clock: C,
}

impl<O: OutputBank, F: AnalogInput, C: Clock> LinearActuator<O, F, C> {
    pub fn new(outputs: O, feedback: F, cfg: LinearCfg, clock: C) -> Self {
        Self {
            outputs,
            feedback,
            cfg,
            clock,
        }
    }

    /// Enact one debounced command, ending in the hold state.
    pub fn drive(&mut self, trend: PositionCommand) -> Result<Actuation> {
        let moved = self.drive_inner(trend);
        // Hold step: force both outputs low unconditionally, even when the
        // trend was a hold or the travel failed mid-way.
        let hold = self
            .outputs
            .set_all_low()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e, "linear outputs")))
            .wrap_err("forcing linear outputs low");
        let moved = moved?;
        hold?;
        Ok(moved)
    }

    fn drive_inner(&mut self, trend: PositionCommand) -> Result<Actuation> {
        let travel = match trend {
            PositionCommand::Max => Travel::Retract,
            PositionCommand::Min => Travel::Extend,
            PositionCommand::Mid | PositionCommand::Invalid => return Ok(Actuation::Held),
        };

        let row = match travel {
            Travel::Extend => LA_EXTEND,
            Travel::Retract => LA_RETRACT,
        };
        self.outputs
            .apply(&row)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e, "linear outputs")))
            .wrap_err("driving linear direction outputs")?;

        match self.cfg.stop {
            StopMode::Timed => {
                // Retraction targets the configured stroke fraction; extension
                // always runs the full stroke so the gripper closes completely.
                let run = match travel {
                    Travel::Retract => self.cfg.stroke_time.mul_f32(self.cfg.stroke_fraction),
                    Travel::Extend => self.cfg.stroke_time,
                };
                tracing::debug!(?travel, run_ms = run.as_millis() as u64, "linear timed travel");
                self.clock.sleep(run);
            }
            StopMode::Feedback => self.travel_until_feedback(travel)?,
        }
        Ok(Actuation::Moved)
    }

    /// Poll the potentiometer until the position crosses the travel's bound,
    /// with a deadline so a dead sensor cannot block the loop.
    fn travel_until_feedback(&mut self, travel: Travel) -> Result<()> {
        let lower_limit = UPPER_LIMIT - self.cfg.stroke_fraction;
        let deadline = self.clock.now() + self.cfg.feedback_timeout;
        loop {
            // The ADC driver returns the previous conversion on the first
            // read after the mux switches; sample twice and trust the second.
            let _stale = self.read_feedback()?;
            let pos = self.read_feedback()?;

            let done = match travel {
                Travel::Extend => pos >= UPPER_LIMIT,
                Travel::Retract => pos <= lower_limit,
            };
            if done {
                tracing::debug!(?travel, pos, "linear feedback bound crossed");
                return Ok(());
            }
            if self.clock.now() >= deadline {
                return Err(eyre::Report::new(SrsError::SensorStall("linear feedback"))
                    .wrap_err("feedback never crossed the travel bound"));
            }
            self.clock.sleep(self.cfg.feedback_poll);
        }
    }

    fn read_feedback(&mut self) -> Result<f32> {
        let timeout = Duration::from_millis(50);
        self.feedback
            .read_normalized(timeout)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e, "linear feedback")))
            .wrap_err("reading potentiometer")
    }
}

impl<O: OutputBank, F: AnalogInput, C: Clock> ActuatorController for LinearActuator<O, F, C> {
    fn actuate(&mut self, trend: PositionCommand) -> Result<Actuation> {
        self.drive(trend)
    }

    fn label(&self) -> &'static str {
        "linear"
    }
}
