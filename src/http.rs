//! HTTP transport for the bus: maps one endpoint onto `execute`.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /CqrsBus`: body = envelope JSON (`{"name": ..., "args": ...}`) or
//!   the canonical `{"<Name>": {...}}` form.
//! - `POST /CqrsBus` with a non-blank `Message` header: body = raw stream,
//!   header = message name (or full envelope JSON).
//!
//! Outcomes map to `200` (JSON body of the handler's value, `null` for
//! commands), `404` and `500` (plain-text body with the failure message).
//! A `Message` header that is not visible ASCII is answered with `500`.
//! Any other path falls through to axum's default 404.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cqrs_bus::{http, MessageBus};
//!
//! let bus = Arc::new(
//!     MessageBus::builder()
//!         .query(SampleQueryHandler::default)
//!         .build()?,
//! );
//!
//! // Get the router to compose with other axum routes
//! let app = http::router(bus.clone());
//!
//! // Or serve directly
//! http::serve(bus, "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use crate::bus::MessageBus;
use crate::outcome::{Outcome, OutcomeStatus};
use crate::stream::RawStream;

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Path of the single bus endpoint.
    pub path: String,
    /// Header that switches the request to stream mode and names the message.
    pub message_header: String,
    /// Optional header whose value labels the raw stream.
    pub stream_label_header: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            path: "/CqrsBus".to_string(),
            message_header: "Message".to_string(),
            stream_label_header: Some("Stream-Label".to_string()),
        }
    }
}

struct Endpoint {
    bus: Arc<MessageBus>,
    config: HttpConfig,
}

/// Build an axum `Router` exposing the bus at the default path.
pub fn router(bus: Arc<MessageBus>) -> Router {
    router_with(bus, HttpConfig::default())
}

/// Build an axum `Router` with explicit transport settings.
pub fn router_with(bus: Arc<MessageBus>, config: HttpConfig) -> Router {
    let path = config.path.clone();
    Router::new()
        .route(&path, post(bus_handler))
        .with_state(Arc::new(Endpoint { bus, config }))
}

/// Serve the bus over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve(bus: Arc<MessageBus>, addr: &str) -> Result<(), std::io::Error> {
    let app = router(bus);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "message bus listening");
    axum::serve(listener, app).await
}

/// `POST <path>`: execute an envelope, or a header-named message with the
/// body as its stream.
async fn bus_handler(
    State(endpoint): State<Arc<Endpoint>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let message = match header_value(&headers, &endpoint.config.message_header) {
        Ok(message) => message,
        Err(outcome) => return outcome_response(outcome),
    };
    let label = match endpoint.config.stream_label_header.as_deref() {
        Some(name) => match header_value(&headers, name) {
            Ok(label) => label,
            Err(outcome) => return outcome_response(outcome),
        },
        None => None,
    };

    let outcome = match message {
        Some(message) => {
            let mut stream = RawStream::new(body.to_vec());
            if let Some(label) = label {
                stream = stream.with_label(label);
            }
            endpoint.bus.execute_with_stream(&message, stream).await
        }
        None => match std::str::from_utf8(&body) {
            Ok(envelope) => endpoint.bus.execute(envelope).await,
            Err(e) => Outcome::handler_error(format!("request body is not UTF-8: {e}")),
        },
    };
    outcome_response(outcome)
}

/// Non-blank header value, trimmed. A value that is not visible ASCII fails
/// the request.
fn header_value(headers: &HeaderMap, name: &str) -> Result<Option<String>, Outcome> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Outcome::handler_error(format!("invalid {name} header")))?
        .trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn outcome_response(outcome: Outcome) -> Response {
    let status =
        StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match outcome.status {
        OutcomeStatus::Ok => (status, Json(outcome.value.unwrap_or(Value::Null))).into_response(),
        OutcomeStatus::NotFound | OutcomeStatus::HandlerError => {
            (status, outcome.message).into_response()
        }
    }
}
