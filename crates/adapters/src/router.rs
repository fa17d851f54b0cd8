//! REST routes for tickets.
//!
//! | Method | Path               | Handler           |
//! |--------|--------------------|-------------------|
//! | GET    | `/rest/list`       | [`list_tickets`]  |
//! | GET    | `/rest/ticket/:id` | [`get_ticket`]    |
//! | POST   | `/rest/ticket`     | [`create_ticket`] |
//! | PUT    | `/rest/ticket/:id` | [`update_ticket`] |
//! | DELETE | `/rest/ticket/:id` | [`delete_ticket`] |

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tickets_protocol::{parse_ticket_id, Ticket, TicketId};
use tickets_storage::TicketStore;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, error};

use crate::error::{ApiError, INTERNAL_ERROR_MESSAGE};
use crate::extract::TicketBody;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<TicketStore>,
}

impl AppState {
    pub fn new(store: TicketStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build the ticket API router.
///
/// Handler panics are turned into a plain 500 response and every request is
/// traced.
pub fn build_router(state: AppState) -> Router {
    with_layers(ticket_routes()).with_state(state)
}

fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/rest/list", get(list_tickets))
        .route("/rest/ticket", post(create_ticket))
        .route(
            "/rest/ticket/:id",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
}

fn with_layers(routes: Router<AppState>) -> Router<AppState> {
    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// `GET /rest/list`
pub async fn list_tickets(State(state): State<AppState>) -> Json<Vec<Ticket>> {
    Json(state.store.list().await)
}

/// `GET /rest/ticket/:id`
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Ticket>, ApiError> {
    let id = path_id(&raw_id)?;
    Ok(Json(state.store.get(id).await?))
}

/// `POST /rest/ticket`
pub async fn create_ticket(
    State(state): State<AppState>,
    TicketBody(ticket): TicketBody,
) -> Json<Ticket> {
    Json(state.store.create(ticket).await)
}

/// `PUT /rest/ticket/:id`
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    TicketBody(patch): TicketBody,
) -> Result<Json<Ticket>, ApiError> {
    let id = path_id(&raw_id)?;
    Ok(Json(state.store.update(id, patch).await?))
}

/// `DELETE /rest/ticket/:id`
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Ticket>, ApiError> {
    let id = path_id(&raw_id)?;
    Ok(Json(state.store.delete(id).await?))
}

/// Ids that do not parse can never match a ticket.
fn path_id(raw_id: &str) -> Result<TicketId, ApiError> {
    parse_ticket_id(raw_id).ok_or_else(|| {
        debug!("Unparseable ticket id {:?}", raw_id);
        ApiError::NotFound
    })
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!("Handler panicked: {}", detail);

    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn create_test_router(temp_dir: &TempDir) -> Router {
        let store = TicketStore::new(temp_dir.path().join("data.json"));
        build_router(AppState::new(store))
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send_json(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let (status, text) = send(router, method, uri, body).await;
        (status, serde_json::from_str(&text).unwrap())
    }

    #[tokio::test]
    async fn test_create_then_list_contains_ticket() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        let body = r#"{"title":"fix bug"}"#;
        let (status, created) = send_json(&router, Method::POST, "/rest/ticket", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["title"], json!("fix bug"));
        assert!(created["id"].is_i64());

        let (status, list) = send_json(&router, Method::GET, "/rest/list", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([created]));
    }

    #[tokio::test]
    async fn test_create_then_get_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        let (_, created) = send_json(
            &router,
            Method::POST,
            "/rest/ticket",
            Some(r#"{"title":"t","priority":3,"tags":["x"]}"#),
        )
        .await;
        let uri = format!("/rest/ticket/{}", created["id"]);

        let (status, fetched) = send_json(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_from_empty_store_is_404() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        let (status, body) = send(&router, Method::GET, "/rest/ticket/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Ticket not found");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_404() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        let (status, body) = send(&router, Method::GET, "/rest/ticket/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Ticket not found");
    }

    #[tokio::test]
    async fn test_hex_id_resolves_to_ticket() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("data.json"), r#"[{"id":16,"a":1}]"#).unwrap();
        let router = create_test_router(&temp_dir);

        let (status, fetched) = send_json(&router, Method::GET, "/rest/ticket/0x10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, json!({"id": 16, "a": 1}));
    }

    #[tokio::test]
    async fn test_plain_text_json_body_is_decoded() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/rest/ticket")
            .header("content-type", "text/plain")
            .body(Body::from(r#"{"title":"x"}"#))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (_, list) = send_json(&router, Method::GET, "/rest/list", None).await;
        assert_eq!(list[0]["title"], json!("x"));
        assert!(list[0]["id"].is_i64());
    }

    #[tokio::test]
    async fn test_update_missing_is_404() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        let (status, body) =
            send(&router, Method::PUT, "/rest/ticket/999", Some(r#"{"x":1}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Ticket not found");
    }

    #[tokio::test]
    async fn test_update_merges_body() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("data.json"), r#"[{"id":1,"a":1,"b":2}]"#).unwrap();
        let router = create_test_router(&temp_dir);

        let (status, updated) =
            send_json(&router, Method::PUT, "/rest/ticket/1", Some(r#"{"b":3}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated, json!({"id": 1, "a": 1, "b": 3}));

        let (_, fetched) = send_json(&router, Method::GET, "/rest/ticket/1", None).await;
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        let (_, created) =
            send_json(&router, Method::POST, "/rest/ticket", Some(r#"{"title":"a"}"#)).await;
        let uri = format!("/rest/ticket/{}", created["id"]);

        let (status, deleted) = send_json(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, created);

        let (status, _) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_size_after_creates_and_deletes() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        let mut ids = Vec::new();
        for i in 0..4 {
            let body = format!(r#"{{"n":{i}}}"#);
            let (_, created) =
                send_json(&router, Method::POST, "/rest/ticket", Some(&body)).await;
            ids.push(created["id"].clone());
        }
        send(&router, Method::DELETE, &format!("/rest/ticket/{}", ids[1]), None).await;

        let (_, list) = send_json(&router, Method::GET, "/rest/list", None).await;
        assert_eq!(list.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_body_creates_bare_ticket() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        let (status, created) = send_json(&router, Method::POST, "/rest/ticket", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created.as_object().unwrap().len(), 1);
        assert!(created["id"].is_i64());
    }

    #[tokio::test]
    async fn test_invalid_body_is_400() {
        let temp_dir = TempDir::new().unwrap();
        let router = create_test_router(&temp_dir);

        for body in ["{broken", "[1,2]", "\"text\""] {
            let (status, text) = send(&router, Method::POST, "/rest/ticket", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(text, "Invalid JSON body");
        }

        let (_, list) = send_json(&router, Method::GET, "/rest/list", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_corrupt_data_file_lists_empty() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("data.json"), "{{{{").unwrap();
        let router = create_test_router(&temp_dir);

        let (status, list) = send_json(&router, Method::GET, "/rest/list", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_500() {
        async fn boom(State(_): State<AppState>) -> &'static str {
            panic!("handler exploded")
        }

        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(TicketStore::new(temp_dir.path().join("data.json")));
        let routes = ticket_routes().route("/rest/boom", get(boom));
        let router = with_layers(routes).with_state(state);

        let (status, body) = send(&router, Method::GET, "/rest/boom", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Something went wrong!");

        let (status, list) = send_json(&router, Method::GET, "/rest/list", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));
    }
}
