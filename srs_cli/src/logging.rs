//! Tracing subscriber setup: console layer plus an optional JSON file layer
//! with configurable rotation.

use std::path::Path;

use eyre::{Result, WrapErr};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::cli::FILE_GUARD;

/// Initialize the global subscriber. `RUST_LOG` wins over the config file's
/// `[logging] level`, which wins over the CLI `--log-level`.
pub fn init(cli_level: &str, json: bool, logging: &srs_config::Logging) -> Result<()> {
    let level = logging.level.as_deref().unwrap_or(cli_level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))?;

    let console = if json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    let file = match logging.file.as_deref() {
        Some(path) => Some(file_layer(path, logging.rotation.as_deref())?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .wrap_err("tracing subscriber already initialized")?;
    Ok(())
}

fn file_layer<S>(path: &str, rotation: Option<&str>) -> Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let p = Path::new(path);
    let dir = match p.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let name = p
        .file_name()
        .map_or_else(|| "srs.log".to_string(), |n| n.to_string_lossy().into_owned());

    let appender = match rotation.unwrap_or("never") {
        "daily" => tracing_appender::rolling::daily(dir, name),
        "hourly" => tracing_appender::rolling::hourly(dir, name),
        "never" => tracing_appender::rolling::never(dir, name),
        other => eyre::bail!("logging.rotation must be never|daily|hourly, got {other:?}"),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = FILE_GUARD.set(guard);

    Ok(fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .boxed())
}
