//! Test and helper mocks for srs_core.

use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use srs_traits::clock::Clock;
use srs_traits::{AnalogInput, Level, OutputBank, PulseInput};

/// Pulse input that returns a fixed sequence of widths, then repeats the
/// last one.
pub struct ScriptedPulse {
    seq: Vec<Duration>,
    idx: usize,
}

impl ScriptedPulse {
    pub fn new(seq: impl Into<Vec<Duration>>) -> Self {
        Self {
            seq: seq.into(),
            idx: 0,
        }
    }
}

impl PulseInput for ScriptedPulse {
    fn measure_pulse(
        &mut self,
        _timeout: Duration,
    ) -> Result<Duration, Box<dyn Error + Send + Sync>> {
        let v = if self.idx < self.seq.len() {
            let x = self.seq[self.idx];
            self.idx += 1;
            x
        } else {
            self.seq.last().copied().unwrap_or(Duration::ZERO)
        };
        Ok(v)
    }
}

/// Pulse input that never sees an edge; every measurement times out.
pub struct StalledPulse;

impl PulseInput for StalledPulse {
    fn measure_pulse(
        &mut self,
        _timeout: Duration,
    ) -> Result<Duration, Box<dyn Error + Send + Sync>> {
        Err("pwm edge timeout".into())
    }
}

/// Output bank spy that records every driven frame and every all-low call.
#[derive(Default)]
pub struct RecordingBank {
    width: usize,
    pub frames: Vec<Vec<Level>>,
    pub lows: usize,
}

impl RecordingBank {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            frames: Vec::new(),
            lows: 0,
        }
    }
}

impl OutputBank for RecordingBank {
    fn width(&self) -> usize {
        self.width
    }

    fn apply(&mut self, levels: &[Level]) -> Result<(), Box<dyn Error + Send + Sync>> {
        assert_eq!(levels.len(), self.width, "frame width mismatch");
        self.frames.push(levels.to_vec());
        Ok(())
    }

    fn set_all_low(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lows += 1;
        Ok(())
    }
}

/// Output bank that drives a limited number of frames successfully and then
/// faults on `apply`, while `set_all_low` keeps working. Models a driver
/// that dies mid-motion.
pub struct FaultyBank {
    width: usize,
    ok_applies: usize,
    applies: usize,
    pub lows: usize,
}

impl FaultyBank {
    pub fn new(width: usize, ok_applies: usize) -> Self {
        Self {
            width,
            ok_applies,
            applies: 0,
            lows: 0,
        }
    }
}

impl OutputBank for FaultyBank {
    fn width(&self) -> usize {
        self.width
    }

    fn apply(&mut self, levels: &[Level]) -> Result<(), Box<dyn Error + Send + Sync>> {
        assert_eq!(levels.len(), self.width, "frame width mismatch");
        if self.applies >= self.ok_applies {
            return Err("gpio write failed".into());
        }
        self.applies += 1;
        Ok(())
    }

    fn set_all_low(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lows += 1;
        Ok(())
    }
}

/// Analog input replaying a fixed sequence, then repeating the last value.
pub struct ScriptedAnalog {
    seq: Vec<f32>,
    idx: usize,
}

impl ScriptedAnalog {
    pub fn new(seq: impl Into<Vec<f32>>) -> Self {
        Self {
            seq: seq.into(),
            idx: 0,
        }
    }

    /// Readings consumed so far.
    pub fn reads(&self) -> usize {
        self.idx
    }
}

impl AnalogInput for ScriptedAnalog {
    fn read_normalized(
        &mut self,
        _timeout: Duration,
    ) -> Result<f32, Box<dyn Error + Send + Sync>> {
        let v = if self.idx < self.seq.len() {
            self.seq[self.idx]
        } else {
            self.seq.last().copied().unwrap_or(0.0)
        };
        self.idx = self.idx.saturating_add(1);
        Ok(v)
    }
}

/// Deterministic clock whose `sleep` advances simulated time instead of
/// blocking; `now() = origin + offset`.
#[derive(Debug, Clone)]
pub struct SimClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }

    /// Total simulated time elapsed (the sum of all sleeps and advances).
    pub fn elapsed(&self) -> Duration {
        self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO)
    }
}

impl Clock for SimClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}
