//! HTTP adapter for the ticket service
//!
//! This crate exposes the ticket store as a small REST API built on axum:
//! routing, request-body decoding, error-to-status mapping and the server
//! loop itself.

pub mod error;
pub mod extract;
pub mod http_server;
pub mod router;

pub use error::ApiError;
pub use extract::TicketBody;
pub use http_server::{HttpServer, ServerConfig};
pub use router::{build_router, AppState};
