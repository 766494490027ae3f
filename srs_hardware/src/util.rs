use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Wait until `read_high` reports the wanted level, or the deadline passes.
/// Returns the instant the level was first observed.
///
/// With `poll_interval == 0` this busy-spins (sub-millisecond edge timing for
/// pulse-width measurement); otherwise it sleeps between polls.
pub fn wait_for_level(
    mut read_high: impl FnMut() -> bool,
    want_high: bool,
    deadline: Instant,
    poll_interval: Duration,
) -> Result<Instant> {
    loop {
        if read_high() == want_high {
            return Ok(Instant::now());
        }
        if Instant::now() >= deadline {
            return Err(HwError::EdgeTimeout);
        }
        if poll_interval.is_zero() {
            std::hint::spin_loop();
        } else {
            std::thread::sleep(poll_interval);
        }
    }
}
