//! The main polling loop over all actuator pipelines.
//!
//! Single-threaded and sequential by design: while one actuator is
//! mid-motion no other input is sampled, so loop responsiveness is bounded by
//! the sum of active motion durations per iteration. Every controller ends
//! each call in the hold state, so stopping between iterations is always
//! safe.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, SrsError};
use crate::pipeline::PollPipeline;

#[derive(Debug, Clone)]
pub struct LoopParams {
    /// Consecutive sensor stalls tolerated per actuator before the loop
    /// gives up. A stalled RC receiver holds that actuator but keeps the
    /// others running until then.
    pub max_consecutive_stalls: u32,
}

impl Default for LoopParams {
    fn default() -> Self {
        Self {
            max_consecutive_stalls: 20,
        }
    }
}

/// Poll every pipeline in order until `shutdown` is raised or an actuator
/// exhausts its stall budget. `cycle_hook` runs once per full iteration
/// (pressure logging, telemetry); its error aborts the loop.
pub fn run_loop<F>(
    pipelines: &mut [&mut dyn PollPipeline],
    shutdown: &AtomicBool,
    params: &LoopParams,
    mut cycle_hook: F,
) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    let mut stall_counts = vec![0u32; pipelines.len()];

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested, leaving poll loop");
            return Ok(());
        }

        for (i, pipeline) in pipelines.iter_mut().enumerate() {
            match pipeline.poll() {
                Ok(outcome) => {
                    stall_counts[i] = 0;
                    tracing::trace!(
                        actuator = pipeline.label(),
                        trend = %outcome.trend,
                        "pipeline polled"
                    );
                }
                Err(e) => {
                    if e.downcast_ref::<SrsError>()
                        .is_some_and(|s| matches!(s, SrsError::SensorStall(_)))
                    {
                        stall_counts[i] += 1;
                        tracing::warn!(
                            actuator = pipeline.label(),
                            consecutive = stall_counts[i],
                            "sensor stall, holding actuator"
                        );
                        if stall_counts[i] >= params.max_consecutive_stalls {
                            return Err(e.wrap_err(format!(
                                "{} stalled {} consecutive polls",
                                pipeline.label(),
                                stall_counts[i]
                            )));
                        }
                    } else {
                        tracing::error!(actuator = pipeline.label(), error = %e, "pipeline failed");
                        return Err(e);
                    }
                }
            }

            if shutdown.load(Ordering::Relaxed) {
                tracing::info!("shutdown requested, leaving poll loop");
                return Ok(());
            }
        }

        cycle_hook()?;
    }
}
