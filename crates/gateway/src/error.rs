//! Error types for the gateway crate

use depthwatch_ports::{DeliveryError, FetchError};
use thiserror::Error;

/// REST-level errors
#[derive(Error, Debug)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {code} - {msg}")]
    Api { code: i32, msg: String },

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing '{0}' in depth payload")]
    MissingSide(&'static str),
}

/// Convert infrastructure RestError to port FetchError
impl From<RestError> for FetchError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Http(e) if e.is_timeout() => FetchError::Timeout,
            RestError::Http(e) if e.is_decode() => FetchError::MalformedPayload(e.to_string()),
            RestError::Http(e) => FetchError::Transport(e.to_string()),
            RestError::Api { code, msg } => FetchError::Api { code, message: msg },
            RestError::Status { status, body } => {
                FetchError::Transport(format!("HTTP {}: {}", status, body))
            }
            RestError::Parse(msg) => FetchError::MalformedPayload(msg),
            err @ RestError::MissingSide(_) => FetchError::MalformedPayload(err.to_string()),
        }
    }
}

/// Convert infrastructure RestError to port DeliveryError
impl From<RestError> for DeliveryError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Status { status, body } => DeliveryError::Rejected { status, body },
            RestError::Api { code, msg } => DeliveryError::Rejected {
                status: code.clamp(0, u16::MAX as i32) as u16,
                body: msg,
            },
            other => DeliveryError::Transport(other.to_string()),
        }
    }
}
