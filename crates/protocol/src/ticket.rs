//! Ticket records.
//!
//! A ticket is an open-schema JSON object. The only field the service
//! interprets is `id`, an integer assigned at creation time; every other
//! field is stored and returned exactly as the client sent it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::ProtocolError;

/// Identifier of a ticket (milliseconds since the Unix epoch at creation).
pub type TicketId = i64;

/// Name of the server-managed identifier field.
pub const ID_FIELD: &str = "id";

/// A single ticket: string keys mapped to arbitrary JSON values.
///
/// Field order is preserved, so a ticket serializes back with its keys in
/// the order they were first written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(Map<String, Value>);

impl Ticket {
    /// Create an empty ticket with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing field map.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a ticket from a decoded JSON document, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(ProtocolError::InvalidFormat {
                reason: format!("ticket must be a JSON object, got {}", kind_of(&other)),
            }),
        }
    }

    /// Decode a ticket from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// The ticket's integer id, if it has one.
    pub fn id(&self) -> Option<TicketId> {
        self.0.get(ID_FIELD).and_then(integral)
    }

    /// Whether this ticket carries the given id.
    pub fn has_id(&self, id: TicketId) -> bool {
        self.id() == Some(id)
    }

    /// Set the `id` field, replacing any value the client supplied.
    pub fn assign_id(&mut self, id: TicketId) {
        self.0.insert(ID_FIELD.to_string(), Value::from(id));
    }

    /// Look up a single field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All fields of the ticket.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Shallow-merge `patch` into this ticket.
    ///
    /// Patch fields overwrite existing fields with the same key and fields
    /// only present here are kept. The stored `id` never changes: a patch
    /// carrying a different `id` has that field dropped.
    pub fn merge(&mut self, patch: Ticket) {
        let current_id = self.0.get(ID_FIELD).cloned();

        for (key, value) in patch.0 {
            if key == ID_FIELD {
                if current_id.as_ref() != Some(&value) {
                    let stored = match &current_id {
                        Some(id) => id.to_string(),
                        None => "<none>".to_string(),
                    };
                    warn!("Ignoring id {} in update of ticket {}", value, stored);
                }
                continue;
            }
            self.0.insert(key, value);
        }
    }
}

impl From<Ticket> for Value {
    fn from(ticket: Ticket) -> Self {
        Value::Object(ticket.0)
    }
}

/// Parse a ticket id from a path segment.
///
/// Leading whitespace and an optional sign are accepted, then the longest
/// run of digits is used and anything after it is ignored (`"12abc"` is
/// `12`). A `0x`/`0X` prefix switches to hexadecimal digits (`"0x10"` is
/// `16`). Input with no leading digits yields `None`, which never matches a
/// stored ticket.
pub fn parse_ticket_id(raw: &str) -> Option<TicketId> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits_len = rest.bytes().take_while(|b| (*b as char).is_digit(radix)).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = TicketId::from_str_radix(&rest[..digits_len], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Id for a ticket created now: the current time in milliseconds.
pub fn next_ticket_id() -> TicketId {
    Utc::now().timestamp_millis()
}

/// Integer value of a JSON number, accepting whole floats such as `5.0`.
fn integral(value: &Value) -> Option<TicketId> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    number
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as TicketId)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
