//! Pulse-width sampling and position classification.
//!
//! The sampler averages several measured pulse widths, folding each one back
//! into the nominal period first (a busy CPU can miss a falling edge, making
//! the measured width span whole extra cycles). The classifier then maps the
//! averaged width into one of three tolerance bands.

use std::time::Duration;

use eyre::WrapErr;
use srs_traits::PulseInput;

use crate::command::PositionCommand;
use crate::config::SignalCfg;
use crate::error::Result;
use crate::hw_error::map_hw_error;

/// Fold a measured pulse width back into `[0, period)` by repeated
/// subtraction of the period.
///
/// For any `width >= period` the result is congruent to `width` modulo
/// `period` and strictly less than `period`.
pub fn fold_into_period(width: Duration, period: Duration) -> Duration {
    debug_assert!(!period.is_zero(), "period must be positive");
    let mut w = width;
    while w >= period {
        w -= period;
    }
    w
}

/// Pulse width corresponding to a duty cycle at a nominal frequency.
pub fn width_for_duty(freq_hz: f64, duty_pct: f64) -> Duration {
    Duration::from_secs_f64((1.0 / freq_hz) * (duty_pct / 100.0))
}

/// Map an averaged pulse width to a position command.
///
/// Bands are evaluated top-down, first match wins. On misconfigured
/// (overlapping) bands the order is the tie-break: Max beats Mid beats Min.
/// Lower bounds are inclusive (`>=`), upper bounds exclusive (`<`); widths at
/// or above `width_max + tol` are outside every band.
pub fn classify(width: Duration, cfg: &SignalCfg) -> PositionCommand {
    let period = 1.0 / cfg.freq_hz;
    let width_max = period * (cfg.duty_max_pct / 100.0);
    let width_min = period * (cfg.duty_min_pct / 100.0);
    let tol = (width_max - width_min) * (cfg.tol_pct / 100.0);

    let w = width.as_secs_f64();
    if w >= width_max + tol {
        PositionCommand::Invalid
    } else if w >= width_max - tol {
        PositionCommand::Max
    } else if w >= width_min + tol {
        PositionCommand::Mid
    } else if w >= width_min - tol {
        PositionCommand::Min
    } else {
        PositionCommand::Invalid
    }
}

/// Averaging pulse-width sampler for one PWM input line.
#[derive(Debug, Clone)]
pub struct PulseSampler {
    cfg: SignalCfg,
}

impl PulseSampler {
    pub fn new(cfg: SignalCfg) -> Self {
        Self { cfg }
    }

    pub fn cfg(&self) -> &SignalCfg {
        &self.cfg
    }

    /// Measure `sample_count` pulses and return the jitter-corrected average
    /// width.
    ///
    /// Each edge-pair wait is bounded by `cfg.edge_timeout`; a flat 0%/100%
    /// duty input therefore returns a `SensorStall` error instead of
    /// blocking the loop forever.
    pub fn average_width<P: PulseInput>(&self, input: &mut P) -> Result<Duration> {
        let period = self.cfg.period();
        let mut sum = Duration::ZERO;
        for _ in 0..self.cfg.sample_count {
            let raw = input
                .measure_pulse(self.cfg.edge_timeout)
                .map_err(|e| eyre::Report::new(map_hw_error(&*e, "pwm edge")))
                .wrap_err("measuring pulse width")?;
            sum += fold_into_period(raw, period);
        }
        let avg = sum / self.cfg.sample_count;
        tracing::trace!(avg_us = avg.as_micros() as u64, "pulse width averaged");
        Ok(avg)
    }
}
