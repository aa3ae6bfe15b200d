use thiserror::Error;

/// Errors raised by the resolver and its configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StationError {
    /// Configuration is missing a value, holds an out-of-range one, or is
    /// internally inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A caller passed a value outside the physical domain of the sensor.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl StationError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        StationError::Config(msg.into())
    }

    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        StationError::InvalidInput(msg.into())
    }
}

pub type Result<T, E = StationError> = std::result::Result<T, E>;
