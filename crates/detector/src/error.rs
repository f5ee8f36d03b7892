use thiserror::Error;

/// Errors raised by the detection engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectorError {
    /// A setting or bucketing parameter is outside its accepted range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Aggregated values left the representable decimal range
    #[error("Decimal overflow: {0}")]
    Overflow(String),
}

pub type DetectorResult<T> = std::result::Result<T, DetectorError>;
