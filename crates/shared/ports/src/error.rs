use thiserror::Error;

/// Failure to obtain an order-book snapshot
///
/// Infrastructure implementations convert their specific errors to this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network or communication failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not complete within the client timeout
    #[error("Request timed out")]
    Timeout,

    /// The exchange answered with an error response
    #[error("API error {code}: {message}")]
    Api { code: i32, message: String },

    /// The payload is missing a side or contains unparsable levels
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// Failure to deliver a notification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Delivery transport error: {0}")]
    Transport(String),

    #[error("Delivery rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The sink did not finish within its time budget
    #[error("Delivery timed out")]
    Timeout,
}
