//! Protocol errors module

use thiserror::Error;

/// Errors decoding a ticket
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed ticket JSON: {source}")]
    SerializationError { source: serde_json::Error },

    #[error("Invalid ticket: {reason}")]
    InvalidFormat { reason: String },
}

impl From<serde_json::Error> for ProtocolError {
    fn from(source: serde_json::Error) -> Self {
        ProtocolError::SerializationError { source }
    }
}
