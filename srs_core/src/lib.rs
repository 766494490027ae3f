#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core SRS control logic (hardware-agnostic).
//!
//! Decodes a position command from an RC PWM input and drives one of three
//! actuators on the ROV's sample-retrieval tool. All hardware interactions
//! go through the `srs_traits` boundary traits.
//!
//! ## Pipeline (per actuator, per poll cycle)
//!
//! - **Sampling**: averaged, drift-folded pulse widths (`signal` module)
//! - **Classification**: tolerance-band mapping to a `PositionCommand`
//! - **Debounce**: history-window persistence filtering (`debounce` module)
//! - **Actuation**: timed / closed-loop motion state machines (`linear`,
//!   `stepper`), all ending in a defined hold state
//!
//! Classification and debounce misses are absorbed as holds; only hardware
//! faults and bounded sensor-stall timeouts surface as errors.

pub mod command;
pub mod config;
pub mod conversions;
pub mod debounce;
pub mod error;
pub mod hw_error;
pub mod linear;
pub mod mocks;
pub mod pipeline;
pub mod pressure;
pub mod runner;
pub mod sequence;
pub mod signal;
pub mod stepper;
pub mod util;

pub use command::PositionCommand;
pub use config::{CarouselCfg, LinearCfg, ShoulderCfg, SignalCfg, StopMode};
pub use debounce::{CommandHistory, DebounceMode};
pub use error::SrsError;
pub use linear::LinearActuator;
pub use pipeline::{Actuation, ActuatorController, Pipeline, PollOutcome, PollPipeline};
pub use signal::{PulseSampler, classify, fold_into_period, width_for_duty};
pub use stepper::{CarouselStepper, ShoulderStepper};
