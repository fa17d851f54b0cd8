//! Error responses for the REST handlers.
//!
//! Clients only ever see a status code and a short plain-text message; the
//! underlying cause is logged on the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tickets_protocol::ProtocolError;
use tickets_storage::StorageError;
use tracing::{error, warn};

/// Body returned for every 404.
pub const NOT_FOUND_MESSAGE: &str = "Ticket not found";
/// Body returned for every 400.
pub const BAD_REQUEST_MESSAGE: &str = "Invalid JSON body";
/// Body returned for every 500.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

/// Errors a handler can produce
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Ticket not found")]
    NotFound,

    #[error("Invalid request body: {source}")]
    InvalidBody { source: ProtocolError },

    #[error("Internal error: {source:#}")]
    Internal { source: anyhow::Error },
}

impl ApiError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TicketNotFound { .. } => ApiError::NotFound,
            other => ApiError::Internal {
                source: other.into(),
            },
        }
    }
}

impl From<ProtocolError> for ApiError {
    fn from(err: ProtocolError) -> Self {
        ApiError::InvalidBody { source: err }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal { source: err }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::NotFound => NOT_FOUND_MESSAGE,
            ApiError::InvalidBody { source } => {
                warn!("Rejected request body: {}", source);
                BAD_REQUEST_MESSAGE
            }
            ApiError::Internal { source } => {
                error!("{:?}", source);
                INTERNAL_ERROR_MESSAGE
            }
        };

        (self.status(), message).into_response()
    }
}
