#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Hardware backends for the SRS controller.
//!
//! Simulated implementations are always available; rppal-backed GPIO and
//! MCP3008 SPI ADC implementations live behind the `hardware` feature
//! (Linux only).

pub mod error;
pub mod util;

#[cfg(feature = "hardware")]
pub mod gpio;
#[cfg(feature = "hardware")]
pub mod mcp3008;

#[cfg(feature = "hardware")]
pub use gpio::{EnableLine, GpioOutputBank, GpioPulseInput};
#[cfg(feature = "hardware")]
pub use mcp3008::Mcp3008;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use srs_traits::{AnalogInput, Level, OutputBank, PulseInput};

/// Simulated PWM input producing pulses of a settable duty cycle.
pub struct SimulatedPulse {
    freq_hz: f64,
    duty_pct: Rc<Cell<f64>>,
}

impl SimulatedPulse {
    pub fn new(freq_hz: f64, duty_pct: f64) -> Self {
        Self {
            freq_hz,
            duty_pct: Rc::new(Cell::new(duty_pct)),
        }
    }

    /// Handle for steering the simulated transmitter stick.
    pub fn duty_handle(&self) -> Rc<Cell<f64>> {
        self.duty_pct.clone()
    }
}

impl PulseInput for SimulatedPulse {
    fn measure_pulse(
        &mut self,
        _timeout: Duration,
    ) -> Result<Duration, Box<dyn std::error::Error + Send + Sync>> {
        let period = 1.0 / self.freq_hz;
        let width = period * self.duty_pct.get() / 100.0;
        tracing::trace!(width_us = (width * 1e6) as u64, "simulated pulse");
        Ok(Duration::from_secs_f64(width))
    }
}

/// Simulated output bank; remembers the last frame it was driven to.
pub struct SimulatedOutputBank {
    label: &'static str,
    levels: Vec<Level>,
}

impl SimulatedOutputBank {
    pub fn new(label: &'static str, width: usize) -> Self {
        Self {
            label,
            levels: vec![Level::Low; width],
        }
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }
}

impl OutputBank for SimulatedOutputBank {
    fn width(&self) -> usize {
        self.levels.len()
    }

    fn apply(&mut self, levels: &[Level]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.levels.copy_from_slice(levels);
        tracing::debug!(bank = self.label, frame = ?levels, "outputs driven (simulated)");
        Ok(())
    }

    fn set_all_low(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.levels.fill(Level::Low);
        Ok(())
    }
}

/// Simulated analog channel that slews toward a target each read, standing in
/// for the actuator potentiometer or the pressure transducer.
///
/// The target is behind an `Arc` so the channel stays `Send` and can be moved
/// into a background sampler thread while the handle steers it.
pub struct SimulatedAnalog {
    value: f32,
    target: Arc<Mutex<f32>>,
    slew_per_read: f32,
}

impl SimulatedAnalog {
    pub fn new(start: f32, slew_per_read: f32) -> Self {
        Self {
            value: start,
            target: Arc::new(Mutex::new(start)),
            slew_per_read,
        }
    }

    pub fn target_handle(&self) -> Arc<Mutex<f32>> {
        self.target.clone()
    }
}

impl AnalogInput for SimulatedAnalog {
    fn read_normalized(
        &mut self,
        _timeout: Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        let target = self.target.lock().map(|g| *g).unwrap_or(self.value);
        let delta = (target - self.value).clamp(-self.slew_per_read, self.slew_per_read);
        self.value = (self.value + delta).clamp(0.0, 1.0);
        Ok(self.value)
    }
}
