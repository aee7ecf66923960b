use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum FleetError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("telemetry source error: {0}")]
    Source(String),
    #[error("invalid input: {0}")]
    Input(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
