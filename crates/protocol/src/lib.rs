//! Ticket protocol types
//!
//! This crate defines the open-schema ticket record exchanged over HTTP and
//! persisted by the storage layer, together with the id rules every layer
//! agrees on.

pub mod errors;
pub mod ticket;

pub use errors::ProtocolError;
pub use ticket::{next_ticket_id, parse_ticket_id, Ticket, TicketId, ID_FIELD};
