//! Flat-file ticket persistence
//!
//! The whole ticket collection lives in one JSON array on disk. Every
//! operation reloads it, and mutations rewrite it in full while holding an
//! exclusive lock so concurrent requests cannot lose each other's updates.

pub mod storage;
pub mod store;

// Re-export key types
pub use storage::{StorageError, TicketFile};
pub use store::TicketStore;
pub use tickets_protocol::{Ticket, TicketId};
