//! cqrs_bus: an in-process Command/Query message bus.
//!
//! Requests arrive as JSON envelopes (`{"name": "...", "args": "..."}`), are
//! resolved against a registry of message shapes, and are dispatched to the
//! single handler bound to that shape. Every dispatch cycle ends in an
//! [`Outcome`]: `Ok`, `NotFound` or `HandlerError`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cqrs_bus::{async_trait, HandlerError, MessageBus, Query, QueryHandler};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, cqrs_bus::Query)]
//! #[query(response = i64)]
//! struct Double {
//!     value: i64,
//! }
//!
//! #[derive(Default)]
//! struct DoubleHandler;
//!
//! #[async_trait]
//! impl QueryHandler for DoubleHandler {
//!     type Query = Double;
//!
//!     async fn handle(&self, query: Double) -> Result<i64, HandlerError> {
//!         Ok(query.value * 2)
//!     }
//! }
//!
//! let bus = MessageBus::builder().query(DoubleHandler::default).build()?;
//! let outcome = bus.execute(r#"{"name":"Double","args":"{\"value\":5}"}"#).await;
//! assert_eq!(outcome.value, Some(serde_json::json!(10)));
//! ```

mod bus;
mod envelope;
mod error;
mod handler;
mod message;
mod outcome;
mod registry;
mod resolver;
mod stream;

#[cfg(feature = "http")]
pub mod http;

pub use bus::{BusBuilder, MessageBus};
pub use envelope::Envelope;
pub use error::{BusError, HandlerError, RegistryError};
pub use handler::{CommandHandler, HandlerKind, QueryHandler, StreamCommandHandler};
pub use message::{to_json, Command, Message, MessageKind, Query};
pub use outcome::{Outcome, OutcomeStatus};
pub use registry::{
    HandlerBinding, HandlerRegistry, HandlerRegistryBuilder, MessageDescriptor, ShapeId,
    TypeRegistry, TypeRegistryBuilder,
};
pub use resolver::{MessageResolver, ResolvedMessage};
pub use stream::RawStream;

// Handler traits are async; re-export the attribute so implementors don't
// need their own dependency on async-trait.
pub use async_trait::async_trait;

#[cfg(feature = "derive")]
pub use cqrs_bus_macros::{Command, Query};
