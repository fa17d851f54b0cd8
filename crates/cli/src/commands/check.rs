//! Check command implementation
//!
//! This module implements the `tickets check` command, which loads the data
//! file the way the server would and reports anything the server would
//! silently paper over.

use anyhow::Result;
use std::collections::HashSet;
use std::path::PathBuf;
use tickets_protocol::{Ticket, TicketId};
use tickets_storage::TicketFile;

/// Arguments for the check command
pub struct CheckArgs {
    /// JSON file holding the tickets
    pub data: PathBuf,
}

/// Summary of a loaded ticket collection
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of tickets in the file
    pub total: usize,
    /// Tickets with no integer `id`
    pub without_id: usize,
    /// Ids carried by more than one ticket
    pub duplicate_ids: Vec<TicketId>,
}

impl CheckReport {
    pub fn is_healthy(&self) -> bool {
        self.without_id == 0 && self.duplicate_ids.is_empty()
    }
}

/// Build a report for a ticket collection
pub fn summarize(tickets: &[Ticket]) -> CheckReport {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut without_id = 0;

    for ticket in tickets {
        match ticket.id() {
            Some(id) => {
                if !seen.insert(id) && !duplicates.contains(&id) {
                    duplicates.push(id);
                }
            }
            None => without_id += 1,
        }
    }

    CheckReport {
        total: tickets.len(),
        without_id,
        duplicate_ids: duplicates,
    }
}

/// Execute the check command
pub async fn execute_check_command(args: CheckArgs) -> Result<()> {
    println!("🔍 Checking ticket data file: {}", args.data.display());

    let file = TicketFile::new(&args.data);
    let tickets = match file.try_read_tickets().await {
        Ok(tickets) => tickets,
        Err(e) if e.is_missing_file() => {
            println!("📭 No data file yet; the server will start with an empty collection");
            return Ok(());
        }
        Err(e) => {
            anyhow::bail!(
                "Data file {} cannot be loaded and would be treated as empty: {}",
                args.data.display(),
                e
            );
        }
    };

    let report = summarize(&tickets);
    println!("🎫 Tickets: {}", report.total);

    if report.without_id > 0 {
        println!("⚠️  Tickets without an id: {}", report.without_id);
    }
    if !report.duplicate_ids.is_empty() {
        println!("⚠️  Duplicate ids: {:?}", report.duplicate_ids);
    }

    if !report.is_healthy() {
        anyhow::bail!("Data file {} has inconsistent ticket ids", args.data.display());
    }

    println!("✅ Data file is consistent");
    Ok(())
}
