//! The per-actuator decoding pipeline: sample → classify → debounce → drive.

use std::time::Duration;

use srs_traits::PulseInput;

use crate::command::PositionCommand;
use crate::debounce::{CommandHistory, DebounceMode};
use crate::error::Result;
use crate::signal::{PulseSampler, classify};

/// Whether applying a debounced command produced motion or a hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuation {
    Moved,
    Held,
}

/// One actuator's motion state machine. Implementations must leave their
/// outputs in the low/hold state before returning, success or not.
pub trait ActuatorController {
    fn actuate(&mut self, trend: PositionCommand) -> Result<Actuation>;
    fn label(&self) -> &'static str;
}

/// Observability record for one poll of one actuator.
#[derive(Debug, Clone, Copy)]
pub struct PollOutcome {
    /// Averaged, jitter-corrected pulse width.
    pub width: Duration,
    /// Raw classification of this cycle's width.
    pub command: PositionCommand,
    /// Debounced command actually handed to the controller.
    pub trend: PositionCommand,
    pub actuation: Actuation,
}

/// Ties one PWM input, classifier config, history window, and controller
/// together. Classification and debounce misses are absorbed here as holds;
/// only hardware faults and sensor stalls surface as errors.
pub struct Pipeline<P, A> {
    input: P,
    sampler: PulseSampler,
    history: CommandHistory,
    mode: DebounceMode,
    controller: A,
}

impl<P: PulseInput, A: ActuatorController> Pipeline<P, A> {
    pub fn new(
        input: P,
        sampler: PulseSampler,
        history: CommandHistory,
        mode: DebounceMode,
        controller: A,
    ) -> Self {
        Self {
            input,
            sampler,
            history,
            mode,
            controller,
        }
    }

    pub fn controller(&self) -> &A {
        &self.controller
    }

    /// Run one full decode-and-drive cycle for this actuator.
    pub fn poll_once(&mut self) -> Result<PollOutcome> {
        let width = self.sampler.average_width(&mut self.input)?;
        let command = classify(width, self.sampler.cfg());
        let trend = self.history.update(command, self.mode);
        let actuation = self.controller.actuate(trend)?;
        tracing::debug!(
            actuator = self.controller.label(),
            width_us = width.as_micros() as u64,
            command = %command,
            trend = %trend,
            moved = matches!(actuation, Actuation::Moved),
            "poll cycle"
        );
        Ok(PollOutcome {
            width,
            command,
            trend,
            actuation,
        })
    }
}

/// Object-safe view of a pipeline, so the poll loop can iterate actuators of
/// different concrete types.
pub trait PollPipeline {
    fn poll(&mut self) -> Result<PollOutcome>;
    fn label(&self) -> &'static str;
}

impl<P: PulseInput, A: ActuatorController> PollPipeline for Pipeline<P, A> {
    fn poll(&mut self) -> Result<PollOutcome> {
        self.poll_once()
    }

    fn label(&self) -> &'static str {
        self.controller.label()
    }
}
