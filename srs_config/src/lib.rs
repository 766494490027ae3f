#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the SRS actuator controller.
//!
//! `Config` and sub-structs are deserialized from TOML and validated. All
//! sections other than `[pins]` have defaults matching the original SRS
//! tuning (70 Hz RC signal, 7–14 % duty, 20 % tolerance, 5-deep history).
use serde::Deserialize;

/// GPIO/ADC channel assignments (BCM pin numbers; ADC inputs are MCP3008
/// channel indices).
#[derive(Debug, Deserialize)]
pub struct Pins {
    /// PWM input from the RC receiver for the linear actuator.
    pub la_pwm_in: u8,
    /// Output-high enable for the linear actuator driver, if wired.
    pub la_enable: Option<u8>,
    /// Driver CH1/CH2 direction outputs.
    pub la_out: [u8; 2],
    /// Potentiometer feedback channel (required for feedback stop mode).
    pub la_feedback_ch: Option<u8>,
    /// PWM input for the carousel stepper.
    pub cs_pwm_in: u8,
    /// Phase A1/A2/B1/B2 outputs for the carousel stepper.
    pub cs_out: [u8; 4],
    /// PWM input for the shoulder stepper.
    pub ss_pwm_in: u8,
    /// Phase A1/A2/B1/B2 outputs for the shoulder stepper.
    pub ss_out: [u8; 4],
    /// Pressure transducer ADC channel.
    pub pressure_ch: Option<u8>,
}

/// Expected shape of the incoming RC PWM signal.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Signal {
    /// Nominal signal frequency [Hz].
    pub freq_hz: f64,
    /// Maximum expected duty cycle [%].
    pub duty_max_pct: f64,
    /// Minimum expected duty cycle [%].
    pub duty_min_pct: f64,
    /// Tolerance on pulse-width deviation, relative to the max−min width
    /// difference [%].
    pub tol_pct: f64,
    /// Pulses averaged per sample.
    pub sample_count: u32,
}

impl Default for Signal {
    fn default() -> Self {
        Self {
            freq_hz: 70.0,
            duty_max_pct: 14.0,
            duty_min_pct: 7.0,
            tol_pct: 20.0,
            sample_count: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DebounceMode {
    #[default]
    Continuous,
    Split,
}

/// Command-history persistence filtering, per actuator.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Debounce {
    /// Position commands retained in each actuator's history window.
    pub depth: usize,
    pub linear: DebounceMode,
    pub carousel: DebounceMode,
    pub shoulder: DebounceMode,
}

impl Default for Debounce {
    fn default() -> Self {
        Self {
            depth: 5,
            linear: DebounceMode::Continuous,
            carousel: DebounceMode::Continuous,
            shoulder: DebounceMode::Continuous,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StopMode {
    /// Run for a fixed time derived from the full-stroke time.
    #[default]
    Timed,
    /// Poll the potentiometer until the target bound is crossed.
    Feedback,
}

/// Linear actuator (gripper) tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Linear {
    /// Full-stroke travel time [s] (Firgelli L16-P: 1.6 s).
    pub stroke_time_s: f64,
    /// Maximum mechanical stroke [inch].
    pub stroke_max_in: f64,
    /// Target stroke [inch].
    pub stroke_target_in: f64,
    pub stop: StopMode,
    /// Feedback polling interval [ms].
    pub feedback_poll_ms: u64,
    /// Bound on one feedback-stopped travel [ms].
    pub feedback_timeout_ms: u64,
}

impl Default for Linear {
    fn default() -> Self {
        Self {
            stroke_time_s: 1.6,
            stroke_max_in: 2.0,
            stroke_target_in: 1.25,
            stop: StopMode::Timed,
            feedback_poll_ms: 5,
            feedback_timeout_ms: 4_000,
        }
    }
}

/// Carousel stepper (gripper selection) tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Carousel {
    /// Full-step angle of the motor [degrees].
    pub step_angle_deg: f64,
    /// Grippers on the carousel; one Max trend advances one gripper position.
    pub gripper_count: u32,
    /// Minimum output persist per half-step [ms].
    pub persist_ms: u64,
}

impl Default for Carousel {
    fn default() -> Self {
        Self {
            step_angle_deg: 1.8,
            gripper_count: 20,
            persist_ms: 10,
        }
    }
}

/// Shoulder stepper (arm tilt) tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Shoulder {
    /// Minimum output persist per half-step [ms].
    pub persist_ms: u64,
}

impl Default for Shoulder {
    fn default() -> Self {
        Self { persist_ms: 10 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Max wait for one PWM edge pair before reporting a sensor stall [ms].
    pub edge_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { edge_ms: 250 }
    }
}

/// Pressure transducer logging (periodic read-and-append).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pressure {
    pub enabled: bool,
    pub sample_rate_hz: u32,
    /// Base name for the date-stamped CSV log file.
    pub log_file: String,
}

impl Default for Pressure {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_rate_hz: 2,
            log_file: "pressure.csv".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub pins: Pins,
    #[serde(default)]
    pub signal: Signal,
    #[serde(default)]
    pub debounce: Debounce,
    #[serde(default)]
    pub linear: Linear,
    #[serde(default)]
    pub carousel: Carousel,
    #[serde(default)]
    pub shoulder: Shoulder,
    #[serde(default)]
    pub timeouts: Timeouts,
    #[serde(default)]
    pub pressure: Pressure,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Signal
        if !(self.signal.freq_hz > 0.0) || !self.signal.freq_hz.is_finite() {
            eyre::bail!("signal.freq_hz must be a positive finite number");
        }
        if !(0.0..=100.0).contains(&self.signal.duty_min_pct) {
            eyre::bail!("signal.duty_min_pct must be in [0, 100]");
        }
        if !(0.0..=100.0).contains(&self.signal.duty_max_pct) {
            eyre::bail!("signal.duty_max_pct must be in [0, 100]");
        }
        if self.signal.duty_min_pct >= self.signal.duty_max_pct {
            eyre::bail!("signal.duty_min_pct must be < signal.duty_max_pct");
        }
        if !(0.0..100.0).contains(&self.signal.tol_pct) {
            eyre::bail!("signal.tol_pct must be in [0, 100)");
        }
        if self.signal.sample_count == 0 {
            eyre::bail!("signal.sample_count must be >= 1");
        }

        // Debounce
        if self.debounce.depth == 0 {
            eyre::bail!("debounce.depth must be >= 1");
        }
        if self.debounce.depth > 64 {
            eyre::bail!("debounce.depth is unreasonably large (>64)");
        }

        // Linear actuator
        if !(self.linear.stroke_time_s > 0.0) {
            eyre::bail!("linear.stroke_time_s must be > 0");
        }
        if !(self.linear.stroke_max_in > 0.0) {
            eyre::bail!("linear.stroke_max_in must be > 0");
        }
        if self.linear.stroke_target_in <= 0.0
            || self.linear.stroke_target_in > self.linear.stroke_max_in
        {
            eyre::bail!("linear.stroke_target_in must be in (0, stroke_max_in]");
        }
        if self.linear.stop == StopMode::Feedback {
            if self.pins.la_feedback_ch.is_none() {
                eyre::bail!("pins.la_feedback_ch is required for linear.stop = \"feedback\"");
            }
            if self.linear.feedback_poll_ms == 0 {
                eyre::bail!("linear.feedback_poll_ms must be >= 1");
            }
            if self.linear.feedback_timeout_ms == 0 {
                eyre::bail!("linear.feedback_timeout_ms must be >= 1");
            }
        }

        // Steppers
        if !(self.carousel.step_angle_deg > 0.0) || self.carousel.step_angle_deg > 90.0 {
            eyre::bail!("carousel.step_angle_deg must be in (0, 90]");
        }
        if self.carousel.gripper_count == 0 {
            eyre::bail!("carousel.gripper_count must be >= 1");
        }
        if self.carousel.persist_ms == 0 {
            eyre::bail!("carousel.persist_ms must be >= 1");
        }
        if self.shoulder.persist_ms == 0 {
            eyre::bail!("shoulder.persist_ms must be >= 1");
        }

        // Timeouts
        if self.timeouts.edge_ms == 0 {
            eyre::bail!("timeouts.edge_ms must be >= 1");
        }
        let period_ms = 1_000.0 / self.signal.freq_hz;
        if (self.timeouts.edge_ms as f64) < period_ms {
            eyre::bail!(
                "timeouts.edge_ms ({} ms) is shorter than one signal period ({:.1} ms)",
                self.timeouts.edge_ms,
                period_ms
            );
        }

        // Pressure logging
        if self.pressure.enabled {
            if self.pressure.sample_rate_hz == 0 {
                eyre::bail!("pressure.sample_rate_hz must be > 0");
            }
            if self.pins.pressure_ch.is_none() {
                eyre::bail!("pins.pressure_ch is required when pressure.enabled = true");
            }
            if self.pressure.log_file.is_empty() {
                eyre::bail!("pressure.log_file must not be empty");
            }
        }

        Ok(())
    }
}
