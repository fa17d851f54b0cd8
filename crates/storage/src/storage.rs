//! Ticket File Module
//!
//! This module implements the storage accessor: it reads and writes the
//! entire ticket collection as a single JSON array in one flat file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tickets_protocol::{Ticket, TicketId};
use tokio::fs;
use tracing::{debug, error, warn};

/// Storage-related errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    SerializationError { source: serde_json::Error },

    #[error("Ticket not found: {id}")]
    TicketNotFound { id: TicketId },
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether this error means the data file simply does not exist yet.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, StorageError::Io { source, .. } if source.kind() == ErrorKind::NotFound)
    }
}

/// Accessor for the JSON file holding every ticket.
#[derive(Debug, Clone)]
pub struct TicketFile {
    path: PathBuf,
}

impl TicketFile {
    /// Create an accessor for the given file path. The file need not exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TicketFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection.
    ///
    /// A missing, unreadable or malformed file is logged and treated as an
    /// empty collection; this never fails.
    pub async fn read_tickets(&self) -> Vec<Ticket> {
        match self.try_read_tickets().await {
            Ok(tickets) => tickets,
            Err(e) if e.is_missing_file() => {
                warn!("Ticket file {} does not exist yet, starting empty", self.path.display());
                Vec::new()
            }
            Err(e) => {
                error!("Failed to read tickets: {}", e);
                Vec::new()
            }
        }
    }

    /// Read the full collection, reporting why it could not be loaded.
    pub async fn try_read_tickets(&self) -> Result<Vec<Ticket>, StorageError> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        let tickets: Vec<Ticket> = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::SerializationError { source: e })?;

        debug!("Loaded {} tickets from {}", tickets.len(), self.path.display());
        Ok(tickets)
    }

    /// Overwrite the file with the full collection.
    ///
    /// Failures are logged and otherwise ignored, so callers always carry on
    /// as if the write succeeded.
    pub async fn write_tickets(&self, tickets: &[Ticket]) {
        if let Err(e) = self.try_write_tickets(tickets).await {
            error!("Failed to write tickets: {}", e);
        }
    }

    /// Overwrite the file with the full collection, reporting failures.
    pub async fn try_write_tickets(&self, tickets: &[Ticket]) -> Result<(), StorageError> {
        let json = serde_json::to_vec(tickets)
            .map_err(|e| StorageError::SerializationError { source: e })?;

        fs::write(&self.path, json)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        debug!("Wrote {} tickets to {}", tickets.len(), self.path.display());
        Ok(())
    }
}
