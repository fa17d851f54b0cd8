//! Ticket Store Module
//!
//! [`TicketStore`] runs each ticket operation as one cycle against the data
//! file: load the collection, apply the operation, and for mutations write
//! the whole collection back. The file sits behind a read/write lock; reads
//! share it while each mutation holds it exclusively for the full cycle.

use std::path::Path;

use tickets_protocol::{next_ticket_id, Ticket, TicketId};
use tokio::sync::RwLock;
use tracing::info;

use crate::storage::{StorageError, TicketFile};

/// Serialized access point to the ticket collection
#[derive(Debug)]
pub struct TicketStore {
    file: RwLock<TicketFile>,
}

impl TicketStore {
    /// Create a store backed by the given data file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(TicketFile::new(path))
    }

    pub fn from_file(file: TicketFile) -> Self {
        TicketStore {
            file: RwLock::new(file),
        }
    }

    /// Every ticket, in creation order
    pub async fn list(&self) -> Vec<Ticket> {
        let file = self.file.read().await;
        file.read_tickets().await
    }

    /// The first ticket with the given id
    pub async fn get(&self, id: TicketId) -> Result<Ticket, StorageError> {
        let file = self.file.read().await;
        file.read_tickets()
            .await
            .into_iter()
            .find(|t| t.has_id(id))
            .ok_or(StorageError::TicketNotFound { id })
    }

    /// Assign an id to `ticket`, append it and persist the collection.
    ///
    /// The id is the current time in milliseconds, bumped past any id
    /// already present so two creates in the same millisecond stay distinct.
    pub async fn create(&self, mut ticket: Ticket) -> Ticket {
        let file = self.file.write().await;
        let mut tickets = file.read_tickets().await;

        let mut id = next_ticket_id();
        while tickets.iter().any(|t| t.has_id(id)) {
            id += 1;
        }
        ticket.assign_id(id);

        tickets.push(ticket.clone());
        info!("Created ticket with id {}", id);

        file.write_tickets(&tickets).await;
        ticket
    }

    /// Merge `patch` into the ticket with the given id and persist.
    pub async fn update(&self, id: TicketId, patch: Ticket) -> Result<Ticket, StorageError> {
        let file = self.file.write().await;
        let mut tickets = file.read_tickets().await;

        let index = tickets
            .iter()
            .position(|t| t.has_id(id))
            .ok_or(StorageError::TicketNotFound { id })?;

        tickets[index].merge(patch);
        let updated = tickets[index].clone();

        file.write_tickets(&tickets).await;
        info!("Updated ticket with id {}", id);
        Ok(updated)
    }

    /// Remove the ticket with the given id and persist.
    pub async fn delete(&self, id: TicketId) -> Result<Ticket, StorageError> {
        let file = self.file.write().await;
        let mut tickets = file.read_tickets().await;

        let index = tickets
            .iter()
            .position(|t| t.has_id(id))
            .ok_or(StorageError::TicketNotFound { id })?;

        let deleted = tickets.remove(index);

        file.write_tickets(&tickets).await;
        info!("Deleted ticket with id {}", id);
        Ok(deleted)
    }
}
