//! Dispatcher: one request/response cycle per envelope.
//!
//! ```text
//! envelope ──► MessageResolver ──► ResolvedMessage ──► HandlerRegistry ──► handler
//!                 (TypeRegistry)                                            │
//!                                                                           ▼
//!                                Outcome { Ok | NotFound | HandlerError } ◄─┘
//! ```
//!
//! Per request: `Received → Resolving → Resolved | NotFound → Dispatching →
//! Ok | HandlerError | NotFound`. There are no retries; every failure is a
//! terminal, reported outcome.

mod builder;
mod bus;

pub use builder::BusBuilder;
pub use bus::MessageBus;
