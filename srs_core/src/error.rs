use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SrsError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("sensor stall waiting for {0}")]
    SensorStall(&'static str),
    #[error("io error: {0}")]
    Io(String),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
