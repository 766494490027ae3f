//! Pipeline assembly and the command implementations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use eyre::{Result, WrapErr};
use srs_config::Config;
use srs_core::pressure::PressureSampler;
use srs_core::runner::{LoopParams, run_loop};
use srs_core::{
    CarouselCfg, CarouselStepper, CommandHistory, LinearActuator, LinearCfg, Pipeline,
    PollPipeline, PulseSampler, ShoulderCfg, ShoulderStepper, SignalCfg, classify, width_for_duty,
};
use srs_hardware::{SimulatedAnalog, SimulatedOutputBank, SimulatedPulse};
use srs_traits::{AnalogInput, MonotonicClock, OutputBank, PulseInput};

use crate::pressure_log::PressureLog;

/// How long the sampler thread may go without a good reading before the
/// poll loop starts warning about a silent transducer.
const PRESSURE_SILENCE_WARN_MS: u64 = 5_000;

/// The three assembled actuator pipelines plus any hardware lines that must
/// stay alive for the duration of the run.
pub struct Rig {
    pub pipelines: Vec<Box<dyn PollPipeline>>,
    #[cfg(feature = "hardware")]
    _enable: Option<srs_hardware::EnableLine>,
}

type DynPulse = Box<dyn PulseInput>;
type DynBank = Box<dyn OutputBank>;
type DynAnalog = Box<dyn AnalogInput>;

fn pipeline_for(
    input: DynPulse,
    signal: &SignalCfg,
    depth: usize,
    mode: srs_config::DebounceMode,
    controller: impl srs_core::ActuatorController + 'static,
) -> Box<dyn PollPipeline> {
    Box::new(Pipeline::new(
        input,
        PulseSampler::new(signal.clone()),
        CommandHistory::new(depth),
        mode.into(),
        controller,
    ))
}

/// Assemble all three pipelines against simulated backends. Every channel
/// sees the same transmitter duty cycle; the default parks the stick at the
/// mid position so nothing moves.
pub fn build_sim(cfg: &Config, sim_duty: Option<f64>) -> Rig {
    let signal = SignalCfg::from_schema(&cfg.signal, &cfg.timeouts);
    let duty = sim_duty.unwrap_or((cfg.signal.duty_max_pct + cfg.signal.duty_min_pct) / 2.0);
    let clock = MonotonicClock::new();

    let linear = LinearActuator::new(
        Box::new(SimulatedOutputBank::new("linear", 2)) as DynBank,
        Box::new(SimulatedAnalog::new(0.5, 0.05)) as DynAnalog,
        LinearCfg::from(&cfg.linear),
        clock,
    );
    let carousel = CarouselStepper::new(
        Box::new(SimulatedOutputBank::new("carousel", 4)) as DynBank,
        CarouselCfg::from(&cfg.carousel),
        clock,
    );
    let shoulder = ShoulderStepper::new(
        Box::new(SimulatedOutputBank::new("shoulder", 4)) as DynBank,
        ShoulderCfg::from(&cfg.shoulder),
        clock,
    );

    let mk_input =
        |freq: f64| Box::new(SimulatedPulse::new(freq, duty)) as DynPulse;
    let depth = cfg.debounce.depth;
    Rig {
        pipelines: vec![
            pipeline_for(mk_input(signal.freq_hz), &signal, depth, cfg.debounce.linear, linear),
            pipeline_for(mk_input(signal.freq_hz), &signal, depth, cfg.debounce.carousel, carousel),
            pipeline_for(mk_input(signal.freq_hz), &signal, depth, cfg.debounce.shoulder, shoulder),
        ],
        #[cfg(feature = "hardware")]
        _enable: None,
    }
}

/// Assemble the pipelines against real GPIO/SPI backends.
#[cfg(feature = "hardware")]
pub fn build_hardware(cfg: &Config) -> Result<Rig> {
    use srs_hardware::{EnableLine, GpioOutputBank, GpioPulseInput, Mcp3008};

    let signal = SignalCfg::from_schema(&cfg.signal, &cfg.timeouts);
    let clock = MonotonicClock::new();
    let pins = &cfg.pins;

    let enable = match pins.la_enable {
        Some(pin) => {
            Some(EnableLine::assert_high(pin).wrap_err("asserting linear actuator enable")?)
        }
        None => None,
    };

    let la_feedback: DynAnalog = match pins.la_feedback_ch {
        Some(ch) => Box::new(Mcp3008::new(ch).wrap_err("opening feedback ADC channel")?),
        // Timed stop mode never reads it; validation forbids feedback mode
        // without a channel.
        None => Box::new(SimulatedAnalog::new(0.5, 0.0)),
    };
    let linear = LinearActuator::new(
        Box::new(GpioOutputBank::new(&pins.la_out).wrap_err("opening linear outputs")?) as DynBank,
        la_feedback,
        LinearCfg::from(&cfg.linear),
        clock,
    );
    let carousel = CarouselStepper::new(
        Box::new(GpioOutputBank::new(&pins.cs_out).wrap_err("opening carousel outputs")?)
            as DynBank,
        CarouselCfg::from(&cfg.carousel),
        clock,
    );
    let shoulder = ShoulderStepper::new(
        Box::new(GpioOutputBank::new(&pins.ss_out).wrap_err("opening shoulder outputs")?)
            as DynBank,
        ShoulderCfg::from(&cfg.shoulder),
        clock,
    );

    let depth = cfg.debounce.depth;
    let mk_input = |pin: u8, what: &str| -> Result<DynPulse> {
        Ok(Box::new(
            GpioPulseInput::new(pin).wrap_err_with(|| format!("opening {what} PWM input"))?,
        ))
    };
    Ok(Rig {
        pipelines: vec![
            pipeline_for(
                mk_input(pins.la_pwm_in, "linear")?,
                &signal,
                depth,
                cfg.debounce.linear,
                linear,
            ),
            pipeline_for(
                mk_input(pins.cs_pwm_in, "carousel")?,
                &signal,
                depth,
                cfg.debounce.carousel,
                carousel,
            ),
            pipeline_for(
                mk_input(pins.ss_pwm_in, "shoulder")?,
                &signal,
                depth,
                cfg.debounce.shoulder,
                shoulder,
            ),
        ],
        _enable: enable,
    })
}

fn build_rig(cfg: &Config, simulate: bool, sim_duty: Option<f64>) -> Result<Rig> {
    if simulate {
        return Ok(build_sim(cfg, sim_duty));
    }
    #[cfg(feature = "hardware")]
    {
        build_hardware(cfg)
    }
    #[cfg(not(feature = "hardware"))]
    {
        eyre::bail!("built without the `hardware` feature; use --simulate")
    }
}

fn pressure_input(cfg: &Config, simulate: bool) -> Result<Box<dyn AnalogInput + Send>> {
    if simulate {
        return Ok(Box::new(SimulatedAnalog::new(0.5, 0.01)));
    }
    #[cfg(feature = "hardware")]
    {
        let ch = cfg
            .pins
            .pressure_ch
            .ok_or_else(|| eyre::eyre!("pins.pressure_ch is required for pressure logging"))?;
        Ok(Box::new(
            srs_hardware::Mcp3008::new(ch).wrap_err("opening pressure ADC channel")?,
        ))
    }
    #[cfg(not(feature = "hardware"))]
    {
        let _ = cfg;
        eyre::bail!("built without the `hardware` feature; use --simulate")
    }
}

/// The `run` command: poll until Ctrl-C, a cycle budget, or a fatal error.
pub fn run(
    cfg: &Config,
    simulate: bool,
    sim_duty: Option<f64>,
    cycles: u64,
    max_stalls: Option<u32>,
) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
        })
        .wrap_err("installing Ctrl-C handler")?;
    }

    let mut rig = build_rig(cfg, simulate, sim_duty)?;
    // Pressure logging is telemetry. A broken log file must never stop the
    // actuators, so creation and write failures downgrade to warnings.
    let mut pressure = if cfg.pressure.enabled {
        match PressureLog::create(&cfg.pressure.log_file) {
            Ok(log) => {
                let sampler = PressureSampler::spawn(
                    pressure_input(cfg, simulate)?,
                    cfg.pressure.sample_rate_hz,
                    Duration::from_millis(100),
                    MonotonicClock::new(),
                );
                Some((sampler, log))
            }
            Err(e) => {
                tracing::warn!(error = %e, "pressure log unavailable, continuing without it");
                None
            }
        }
    } else {
        None
    };

    let mut params = LoopParams::default();
    if let Some(n) = max_stalls {
        params.max_consecutive_stalls = n;
    }

    tracing::info!(
        simulate,
        actuators = rig.pipelines.len(),
        pressure = pressure.is_some(),
        "entering poll loop"
    );

    let mut refs: Vec<&mut dyn PollPipeline> = rig
        .pipelines
        .iter_mut()
        .map(|p| &mut **p as &mut dyn PollPipeline)
        .collect();
    let mut count: u64 = 0;
    run_loop(&mut refs, &shutdown, &params, || {
        count += 1;
        if let Some((sampler, log)) = pressure.as_mut() {
            match sampler.latest() {
                Some(v) => {
                    if let Err(e) = log.record(v) {
                        tracing::warn!(error = %e, "pressure log write failed");
                    }
                }
                None => {
                    let silent_ms = sampler.stalled_for_ms(&MonotonicClock::new());
                    if silent_ms > PRESSURE_SILENCE_WARN_MS {
                        tracing::warn!(silent_ms, "no pressure reading from the transducer");
                    }
                }
            }
        }
        if cycles != 0 && count >= cycles {
            shutdown.store(true, Ordering::Relaxed);
        }
        Ok(())
    })?;

    tracing::info!(cycles = count, "poll loop finished");
    Ok(())
}

/// The `self-check` command: one simulated poll per actuator with the stick
/// parked at mid, expecting a hold everywhere.
pub fn self_check(cfg: &Config, json: bool) -> Result<()> {
    let mut rig = build_sim(cfg, None);
    for pipeline in &mut rig.pipelines {
        let out = pipeline
            .poll()
            .wrap_err_with(|| format!("self-check poll of {}", pipeline.label()))?;
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "event": "self_check",
                    "actuator": pipeline.label(),
                    "width_us": out.width.as_micros() as u64,
                    "command": out.command.to_string(),
                    "trend": out.trend.to_string(),
                })
            );
        } else {
            println!(
                "{}: width {} us -> {} (trend {})",
                pipeline.label(),
                out.width.as_micros(),
                out.command,
                out.trend
            );
        }
    }
    if !json {
        println!("self-check ok");
    }
    Ok(())
}

/// The `decode` command: classify one width or duty cycle offline.
pub fn decode(
    cfg: &Config,
    width_us: Option<u64>,
    duty_pct: Option<f64>,
    json: bool,
) -> Result<()> {
    let signal = SignalCfg::from_schema(&cfg.signal, &cfg.timeouts);
    let width = match (width_us, duty_pct) {
        (Some(us), _) => Duration::from_micros(us),
        (None, Some(pct)) => width_for_duty(signal.freq_hz, pct),
        (None, None) => eyre::bail!("pass --width-us or --duty-pct"),
    };
    let command = classify(width, &signal);
    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "decode",
                "width_us": width.as_micros() as u64,
                "command": command.to_string(),
                "code": command.as_code(),
            })
        );
    } else {
        println!("{} us -> {}", width.as_micros(), command);
    }
    Ok(())
}
