//! Human-readable error descriptions and structured JSON error formatting.

use srs_core::SrsError;

/// Map an eyre::Report to a human-readable explanation with likely causes
/// and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(se) = find_srs_error(err) {
        return match se {
            SrsError::SensorStall(what) => format!(
                "What happened: No signal from the {what} within its timeout.\nLikely causes: RC receiver off or unplugged, broken signal wire, dead potentiometer.\nHow to fix: Check the receiver and the wiring for that channel, then restart the run."
            ),
            SrsError::Hardware(msg) | SrsError::HardwareFault(msg) => format!(
                "What happened: A hardware operation failed ({msg}).\nLikely causes: Wrong BCM pin numbers in [pins], missing GPIO/SPI permissions, or a disconnected driver board.\nHow to fix: Verify the [pins] section and run with access to /dev/gpiomem and /dev/spidev0.0."
            ),
            SrsError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file and rerun; see the sample in etc/."
            ),
            SrsError::Io(msg) => format!(
                "What happened: An I/O operation failed ({msg}).\nLikely causes: A missing file or directory, or insufficient permissions.\nHow to fix: Check the config path and the [logging] and [pressure] paths."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("signal.") || lower.contains("debounce.") || lower.contains("pins.") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nHow to fix: Edit the TOML config and try again."
        );
    }
    if lower.contains("no such file") || lower.contains("failed to read config") {
        return format!(
            "What happened: The config file could not be read.\nHow to fix: Pass --config <FILE> or create etc/srs_config.toml.\nOriginal: {msg}"
        );
    }

    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: config 2, sensor stall 3, hardware 4, everything
/// else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match find_srs_error(err) {
        Some(SrsError::Config(_)) => 2,
        Some(SrsError::SensorStall(_)) => 3,
        Some(SrsError::Hardware(_) | SrsError::HardwareFault(_)) => 4,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    let kind = match find_srs_error(err) {
        Some(SrsError::SensorStall(_)) => "sensor_stall",
        Some(SrsError::Hardware(_) | SrsError::HardwareFault(_)) => "hardware",
        Some(SrsError::Config(_)) => "config",
        Some(SrsError::Io(_)) => "io",
        None => "error",
    };
    serde_json::json!({
        "event": "error",
        "kind": kind,
        "message": err.to_string(),
        "human": humanize(err),
    })
    .to_string()
}

fn find_srs_error(err: &eyre::Report) -> Option<&SrsError> {
    err.chain().find_map(|c| c.downcast_ref::<SrsError>())
}
