pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::time::Duration;

/// Logic level on a digital output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// A PWM input line that can measure one high pulse.
///
/// `measure_pulse` blocks until a rising edge followed by a falling edge has
/// been observed and returns the high duration, or errors once `timeout`
/// expires without the expected edge pair (a flat 0%/100% duty signal).
pub trait PulseInput {
    fn measure_pulse(
        &mut self,
        timeout: Duration,
    ) -> Result<Duration, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: PulseInput + ?Sized> PulseInput for Box<T> {
    fn measure_pulse(
        &mut self,
        timeout: Duration,
    ) -> Result<Duration, Box<dyn std::error::Error + Send + Sync>> {
        (**self).measure_pulse(timeout)
    }
}

impl<T: PulseInput + ?Sized> PulseInput for &mut T {
    fn measure_pulse(
        &mut self,
        timeout: Duration,
    ) -> Result<Duration, Box<dyn std::error::Error + Send + Sync>> {
        (**self).measure_pulse(timeout)
    }
}

/// An analog input channel producing readings normalized to `[0.0, 1.0]`.
pub trait AnalogInput {
    fn read_normalized(
        &mut self,
        timeout: Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for Box<T> {
    fn read_normalized(
        &mut self,
        timeout: Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_normalized(timeout)
    }
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read_normalized(
        &mut self,
        timeout: Duration,
    ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_normalized(timeout)
    }
}

/// A fixed-width bank of digital output pins driven as one unit.
///
/// Implementations own their pins exclusively; two controllers never share a
/// bank. `set_all_low` is the defined hold state every controller must leave
/// the bank in before returning.
pub trait OutputBank {
    /// Number of pins in the bank.
    fn width(&self) -> usize;

    /// Drive each pin to the corresponding level. `levels.len()` must equal
    /// `width()`.
    fn apply(
        &mut self,
        levels: &[Level],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Drive every pin low (hold / no residual drive signal).
    fn set_all_low(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: OutputBank + ?Sized> OutputBank for Box<T> {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn apply(
        &mut self,
        levels: &[Level],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).apply(levels)
    }

    fn set_all_low(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_all_low()
    }
}

impl<T: OutputBank + ?Sized> OutputBank for &mut T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn apply(
        &mut self,
        levels: &[Level],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).apply(levels)
    }

    fn set_all_low(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_all_low()
    }
}
