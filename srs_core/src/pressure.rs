//! Background pressure-transducer sampling.
//!
//! Spawns a thread that owns the `AnalogInput`, pushes latest readings via a
//! bounded channel, and tracks the last-ok timestamp so consumers can detect
//! a dead transducer. The poll loop drains readings between actuator polls
//! and appends them to the dive log.
//!
//! Safety: each `PressureSampler` spawns exactly one thread that is shut
//! down when the sampler is dropped, preventing thread leaks.
use crossbeam_channel as xch;
use srs_traits::AnalogInput;
use srs_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub struct PressureSampler {
    rx: xch::Receiver<f32>,
    last_ok: Arc<AtomicU64>,
    epoch: Instant,
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    /// Join handle for graceful thread cleanup
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl PressureSampler {
    pub fn spawn<A: AnalogInput + Send + 'static, C: Clock + Send + Sync + 'static>(
        mut input: A,
        hz: u32,
        timeout: Duration,
        clock: C,
    ) -> Self {
        let (tx, rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let period = Duration::from_micros(crate::util::period_us(hz));
        let epoch = clock.now();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("pressure sampler thread received shutdown signal");
                    break;
                }

                match input.read_normalized(timeout) {
                    Ok(v) => {
                        // If send fails, consumer is gone; exit gracefully
                        if tx.send(v).is_err() {
                            tracing::debug!("pressure consumer disconnected, exiting thread");
                            break;
                        }
                        let now = clock.ms_since(epoch);
                        last_ok_clone.store(now, Ordering::Relaxed);
                    }
                    Err(e) => {
                        // Transient read failure; the consumer tracks staleness.
                        tracing::warn!(error = %e, "pressure read failed");
                    }
                }

                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(period);
            }
            tracing::trace!("pressure sampler thread exiting cleanly");
        });

        Self {
            rx,
            last_ok,
            epoch,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Most recent reading since the last call, if any.
    pub fn latest(&self) -> Option<f32> {
        self.rx.try_iter().last()
    }

    /// Milliseconds since the last successful reading. Measured against the
    /// same epoch the sampler thread stamps, so the caller's clock must be
    /// the one passed to `spawn`.
    pub fn stalled_for_ms<C: Clock>(&self, clock: &C) -> u64 {
        clock
            .ms_since(self.epoch)
            .saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }
}

impl Drop for PressureSampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The thread exits promptly: it checks the flag before and after each
        // read, and reads are bounded by the ADC timeout.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("pressure sampler thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "pressure sampler thread panicked during shutdown");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srs_traits::clock::MonotonicClock;

    struct FixedAnalog(f32);
    impl AnalogInput for FixedAnalog {
        fn read_normalized(
            &mut self,
            _timeout: Duration,
        ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.0)
        }
    }

    #[test]
    fn delivers_readings_and_shuts_down_on_drop() {
        let sampler = PressureSampler::spawn(
            FixedAnalog(0.42),
            200,
            Duration::from_millis(10),
            MonotonicClock::new(),
        );
        let mut got = None;
        for _ in 0..100 {
            if let Some(v) = sampler.latest() {
                got = Some(v);
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        let v = got.expect("no reading arrived");
        assert!((v - 0.42).abs() < f32::EPSILON);
        drop(sampler); // must join without hanging
    }

    struct DeadAnalog;
    impl AnalogInput for DeadAnalog {
        fn read_normalized(
            &mut self,
            _timeout: Duration,
        ) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
            Err("adc read timeout".into())
        }
    }

    #[test]
    fn silence_is_measured_from_the_last_good_reading() {
        let clock = MonotonicClock::new();
        let sampler =
            PressureSampler::spawn(DeadAnalog, 200, Duration::from_millis(10), clock);
        std::thread::sleep(Duration::from_millis(50));
        assert!(sampler.latest().is_none());
        assert!(sampler.stalled_for_ms(&clock) >= 40);
    }
}
