//! Maps `Box<dyn Error>` from trait boundaries to typed `SrsError`.
//!
//! The traits in `srs_traits` use `Box<dyn Error + Send + Sync>` for maximum
//! flexibility; this module converts those to our typed error enum, with an
//! optional feature-gated path for `srs_hardware::HwError` downcasting.

use crate::error::SrsError;

/// Map a trait-boundary error to a typed `SrsError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static), waiting_on: &'static str) -> SrsError {
    // Feature-gated: try to downcast to HwError for precise mapping
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<srs_hardware::error::HwError>() {
            return match hw {
                srs_hardware::error::HwError::EdgeTimeout
                | srs_hardware::error::HwError::AdcTimeout => SrsError::SensorStall(waiting_on),
                other => SrsError::HardwareFault(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        SrsError::SensorStall(waiting_on)
    } else {
        SrsError::Hardware(s)
    }
}
