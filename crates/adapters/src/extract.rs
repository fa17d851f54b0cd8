//! Request body extraction.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use tickets_protocol::Ticket;

use crate::error::ApiError;

/// A ticket field set decoded from the request body.
///
/// The body is decoded as JSON whatever `Content-Type` the client sent, so
/// a JSON object posted as `text/plain` still becomes the ticket's fields.
/// A parser that only reads `application/json` bodies would skip it and
/// create a bare `{id}` ticket instead. An empty body is an empty field
/// set; anything other than a JSON object is rejected with 400. Failures
/// reading the body itself (such as an oversized payload) keep axum's own
/// rejection status.
#[derive(Debug, Clone)]
pub struct TicketBody(pub Ticket);

#[async_trait]
impl<S> FromRequest<S> for TicketBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(TicketBody(Ticket::new()));
        }

        Ticket::from_slice(&bytes)
            .map(TicketBody)
            .map_err(|e| ApiError::from(e).into_response())
    }
}
