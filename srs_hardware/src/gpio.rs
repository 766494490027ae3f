//! rppal-backed GPIO implementations of the hardware traits.

use std::time::{Duration, Instant};

use rppal::gpio::{Gpio, InputPin, OutputPin};
use srs_traits::{Level, OutputBank, PulseInput};
use tracing::trace;

use crate::error::{HwError, Result};
use crate::util::wait_for_level;

/// PWM input line measured by busy-polling the pin level.
///
/// The RC receiver's pulses are 1–2 ms wide, so edge waits spin rather than
/// sleep; the enclosing control loop tolerates that.
pub struct GpioPulseInput {
    pin: InputPin,
}

impl GpioPulseInput {
    pub fn new(bcm_pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let pin = gpio
            .get(bcm_pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input();
        Ok(Self { pin })
    }

    fn measure(&mut self, timeout: Duration) -> Result<Duration> {
        let deadline = Instant::now() + timeout;
        // If we join mid-pulse, let the current high phase pass so the
        // measurement starts on a clean rising edge.
        wait_for_level(|| self.pin.is_high(), false, deadline, Duration::ZERO)?;
        let t_rise = wait_for_level(|| self.pin.is_high(), true, deadline, Duration::ZERO)?;
        let t_fall = wait_for_level(|| self.pin.is_high(), false, deadline, Duration::ZERO)?;
        let width = t_fall.saturating_duration_since(t_rise);
        trace!(width_us = width.as_micros() as u64, "pwm pulse measured");
        Ok(width)
    }
}

impl PulseInput for GpioPulseInput {
    fn measure_pulse(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<Duration, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.measure(timeout)?)
    }
}

/// A bank of GPIO output pins driven together (actuator driver channels or
/// stepper phase switches).
pub struct GpioOutputBank {
    pins: Vec<OutputPin>,
}

impl GpioOutputBank {
    pub fn new(bcm_pins: &[u8]) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let mut pins = Vec::with_capacity(bcm_pins.len());
        for &p in bcm_pins {
            let mut pin = gpio
                .get(p)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_output();
            pin.set_low();
            pins.push(pin);
        }
        Ok(Self { pins })
    }
}

impl OutputBank for GpioOutputBank {
    fn width(&self) -> usize {
        self.pins.len()
    }

    fn apply(
        &mut self,
        levels: &[Level],
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if levels.len() != self.pins.len() {
            return Err(Box::new(HwError::Gpio(format!(
                "level frame width {} != bank width {}",
                levels.len(),
                self.pins.len()
            ))));
        }
        for (pin, level) in self.pins.iter_mut().zip(levels) {
            match level {
                Level::High => pin.set_high(),
                Level::Low => pin.set_low(),
            }
        }
        Ok(())
    }

    fn set_all_low(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for pin in &mut self.pins {
            pin.set_low();
        }
        Ok(())
    }
}

/// A single always-high enable line (driver output-enable).
pub struct EnableLine {
    pin: OutputPin,
}

impl EnableLine {
    pub fn assert_high(bcm_pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let mut pin = gpio
            .get(bcm_pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_output();
        pin.set_high();
        Ok(Self { pin })
    }
}

impl Drop for EnableLine {
    fn drop(&mut self) {
        self.pin.set_low();
    }
}
