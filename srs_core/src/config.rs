//! Runtime configuration structs for the control pipeline.
//!
//! These are the in-memory configs consumed by the controllers. They are
//! separate from the TOML-deserialized schema in `srs_config`; see
//! `conversions` for the mapping.

use std::time::Duration;

/// Expected shape of the incoming RC PWM signal.
#[derive(Debug, Clone)]
pub struct SignalCfg {
    /// Nominal signal frequency [Hz].
    pub freq_hz: f64,
    /// Maximum expected duty cycle [%].
    pub duty_max_pct: f64,
    /// Minimum expected duty cycle [%].
    pub duty_min_pct: f64,
    /// Tolerance on pulse-width deviation, expressed relative to the
    /// difference between the max and min expected widths [%].
    pub tol_pct: f64,
    /// Pulses averaged before classification.
    pub sample_count: u32,
    /// Bound on one edge-pair wait; expiry surfaces as a sensor stall.
    pub edge_timeout: Duration,
}

impl Default for SignalCfg {
    fn default() -> Self {
        Self {
            freq_hz: 70.0,
            duty_max_pct: 14.0,
            duty_min_pct: 7.0,
            tol_pct: 20.0,
            sample_count: 5,
            edge_timeout: Duration::from_millis(250),
        }
    }
}

impl SignalCfg {
    /// Nominal signal period.
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.freq_hz)
    }
}

/// How a linear-actuator travel terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Run for a fixed time derived from the full-stroke time.
    Timed,
    /// Poll the potentiometer until the target bound is crossed.
    Feedback,
}

/// Linear actuator (gripper) configuration.
#[derive(Debug, Clone)]
pub struct LinearCfg {
    /// Full-stroke travel time.
    pub stroke_time: Duration,
    /// Target travel as a fraction of the maximum mechanical stroke.
    pub stroke_fraction: f32,
    pub stop: StopMode,
    /// Feedback polling interval.
    pub feedback_poll: Duration,
    /// Bound on one feedback-stopped travel; expiry surfaces as a sensor
    /// stall.
    pub feedback_timeout: Duration,
}

impl Default for LinearCfg {
    fn default() -> Self {
        Self {
            stroke_time: Duration::from_millis(1_600),
            stroke_fraction: 0.625, // 1.25 in of a 2 in stroke
            stop: StopMode::Timed,
            feedback_poll: Duration::from_millis(5),
            feedback_timeout: Duration::from_millis(4_000),
        }
    }
}

/// Carousel stepper (gripper selection) configuration.
#[derive(Debug, Clone)]
pub struct CarouselCfg {
    /// Full-step angle of the motor [degrees].
    pub step_angle_deg: f64,
    /// Grippers on the carousel; one Max trend advances one gripper position.
    pub gripper_count: u32,
    /// Minimum output persist per half-step (driver minimum pulse width).
    pub persist: Duration,
}

impl Default for CarouselCfg {
    fn default() -> Self {
        Self {
            step_angle_deg: 1.8,
            gripper_count: 20,
            persist: Duration::from_millis(10),
        }
    }
}

/// Shoulder stepper (arm tilt) configuration.
#[derive(Debug, Clone)]
pub struct ShoulderCfg {
    /// Minimum output persist per half-step (driver minimum pulse width).
    pub persist: Duration,
}

impl Default for ShoulderCfg {
    fn default() -> Self {
        Self {
            persist: Duration::from_millis(10),
        }
    }
}
