//! `srs` binary entry point: parse args, load config, dispatch.

mod cli;
mod error_fmt;
mod logging;
mod pressure_log;
mod run;

use clap::Parser;
use eyre::{Result, WrapErr};
use srs_core::SrsError;

fn main() {
    let args = cli::Cli::parse();
    let _ = cli::JSON_MODE.set(args.json);

    if let Err(err) = try_main(args) {
        if cli::JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::format_error_json(&err));
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        std::process::exit(error_fmt::exit_code_for_error(&err));
    }
}

fn try_main(args: cli::Cli) -> Result<()> {
    color_eyre::install()?;

    // Typed wrappers here keep the documented exit codes reachable: a bad
    // config exits 2 instead of the generic 1.
    let text = std::fs::read_to_string(&args.config)
        .map_err(|e| SrsError::Io(e.to_string()))
        .wrap_err_with(|| format!("failed to read config {}", args.config.display()))?;
    let cfg = srs_config::load_toml(&text)
        .map_err(|e| SrsError::Config(e.to_string()))
        .wrap_err("failed to parse config TOML")?;
    cfg.validate()
        .map_err(|e| SrsError::Config(e.to_string()))
        .wrap_err("invalid configuration")?;

    logging::init(&args.log_level, args.json, &cfg.logging)?;

    match args.cmd {
        cli::Commands::Run {
            simulate,
            sim_duty,
            cycles,
            max_stalls,
        } => run::run(&cfg, simulate, sim_duty, cycles, max_stalls),
        cli::Commands::SelfCheck => run::self_check(&cfg, args.json),
        cli::Commands::Decode { width_us, duty_pct } => {
            run::decode(&cfg, width_us, duty_pct, args.json)
        }
    }
}
