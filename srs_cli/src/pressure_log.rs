//! Date-stamped CSV dive log for the pressure transducer.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::Local;
use eyre::{Result, WrapErr};

/// Append-only CSV log; one row per reading, `HH:MM:SS` plus the normalized
/// transducer value.
pub struct PressureLog {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl PressureLog {
    /// Create the log next to the configured base name with today's date
    /// prepended, e.g. `pressure.csv` becomes `2026-08-30_pressure.csv`.
    pub fn create(base: &str) -> Result<Self> {
        let base_path = Path::new(base);
        let name = base_path
            .file_name()
            .map_or_else(|| "pressure.csv".to_string(), |n| n.to_string_lossy().into_owned());
        let stamped = format!("{}_{name}", Local::now().format("%Y-%m-%d"));
        let path = match base_path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d.join(&stamped),
            _ => PathBuf::from(&stamped),
        };

        let mut writer = csv::Writer::from_path(&path)
            .wrap_err_with(|| format!("opening pressure log {}", path.display()))?;
        writer.write_record(["time", "pressure_raw"])?;
        writer.flush()?;
        tracing::info!(path = %path.display(), "pressure log opened");
        Ok(Self { writer, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped reading and flush so a lost ROV tether does
    /// not lose buffered rows.
    pub fn record(&mut self, normalized: f32) -> Result<()> {
        self.writer.write_record([
            Local::now().format("%H:%M:%S").to_string(),
            format!("{normalized:.4}"),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}
