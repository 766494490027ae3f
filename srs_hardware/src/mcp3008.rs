//! MCP3008 10-bit SPI ADC reader for the actuator potentiometer and the
//! pressure transducer.

use std::time::Duration;

use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tracing::trace;

use crate::error::{HwError, Result};

const FULL_SCALE: f32 = 1023.0;

pub struct Mcp3008 {
    spi: Spi,
    channel: u8,
}

impl Mcp3008 {
    pub fn new(channel: u8) -> Result<Self> {
        if channel > 7 {
            return Err(HwError::Spi(format!("mcp3008 channel {channel} out of range")));
        }
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, 1_350_000, Mode::Mode0)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        Ok(Self { spi, channel })
    }

    /// One single-ended conversion, normalized to `[0.0, 1.0]`.
    pub fn read(&mut self) -> Result<f32> {
        // Start bit, single-ended mode + channel, then one clocking byte.
        let tx = [0x01, (0x08 | self.channel) << 4, 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        let raw = (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2]);
        trace!(channel = self.channel, raw, "mcp3008 sample");
        Ok(f32::from(raw) / FULL_SCALE)
    }
}

impl srs_traits::AnalogInput for Mcp3008 {
    fn read_normalized(
        &mut self,
        _timeout: Duration,
    ) -> std::result::Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        // SPI conversion completes in microseconds; no explicit deadline needed.
        Ok(self.read()?)
    }
}
