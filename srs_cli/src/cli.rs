//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "srs",
    version,
    about = "ROV sample-retrieval-system actuator controller"
)]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/srs_config.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the RC inputs and drive the actuators until interrupted
    Run {
        /// Use simulated backends instead of GPIO/SPI hardware
        #[arg(long, action = ArgAction::SetTrue)]
        simulate: bool,

        /// Simulated transmitter duty cycle [%] on every channel
        /// (only meaningful with --simulate)
        #[arg(long, value_name = "PCT")]
        sim_duty: Option<f64>,

        /// Stop after this many loop iterations (0 = run until Ctrl-C)
        #[arg(long, value_name = "N", default_value_t = 0)]
        cycles: u64,

        /// Consecutive sensor stalls tolerated per actuator before aborting
        #[arg(long, value_name = "N")]
        max_stalls: Option<u32>,
    },
    /// Validate the config and poll each simulated pipeline once
    SelfCheck,
    /// Classify a single pulse width or duty cycle against the config bands
    Decode {
        /// Pulse width to classify [us]
        #[arg(long, value_name = "US", conflicts_with = "duty_pct")]
        width_us: Option<u64>,

        /// Duty cycle to classify [%]
        #[arg(long, value_name = "PCT")]
        duty_pct: Option<f64>,
    },
}
