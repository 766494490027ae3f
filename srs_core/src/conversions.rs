//! Mapping from the TOML-deserialized schema (`srs_config`) to the runtime
//! configs consumed by the controllers.

use std::time::Duration;

use crate::config::{CarouselCfg, LinearCfg, ShoulderCfg, SignalCfg, StopMode};
use crate::debounce::DebounceMode;

impl SignalCfg {
    pub fn from_schema(signal: &srs_config::Signal, timeouts: &srs_config::Timeouts) -> Self {
        Self {
            freq_hz: signal.freq_hz,
            duty_max_pct: signal.duty_max_pct,
            duty_min_pct: signal.duty_min_pct,
            tol_pct: signal.tol_pct,
            sample_count: signal.sample_count,
            edge_timeout: Duration::from_millis(timeouts.edge_ms),
        }
    }
}

impl From<srs_config::DebounceMode> for DebounceMode {
    fn from(m: srs_config::DebounceMode) -> Self {
        match m {
            srs_config::DebounceMode::Continuous => Self::ContinuousCheck,
            srs_config::DebounceMode::Split => Self::SplitCheck,
        }
    }
}

impl From<&srs_config::Linear> for LinearCfg {
    fn from(l: &srs_config::Linear) -> Self {
        Self {
            stroke_time: Duration::from_secs_f64(l.stroke_time_s),
            stroke_fraction: (l.stroke_target_in / l.stroke_max_in) as f32,
            stop: match l.stop {
                srs_config::StopMode::Timed => StopMode::Timed,
                srs_config::StopMode::Feedback => StopMode::Feedback,
            },
            feedback_poll: Duration::from_millis(l.feedback_poll_ms),
            feedback_timeout: Duration::from_millis(l.feedback_timeout_ms),
        }
    }
}

impl From<&srs_config::Carousel> for CarouselCfg {
    fn from(c: &srs_config::Carousel) -> Self {
        Self {
            step_angle_deg: c.step_angle_deg,
            gripper_count: c.gripper_count,
            persist: Duration::from_millis(c.persist_ms),
        }
    }
}

impl From<&srs_config::Shoulder> for ShoulderCfg {
    fn from(s: &srs_config::Shoulder) -> Self {
        Self {
            persist: Duration::from_millis(s.persist_ms),
        }
    }
}
