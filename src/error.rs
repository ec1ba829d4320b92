//! Error types for message resolution, registry construction and handlers.

use std::error::Error;
use std::fmt;

use thiserror::Error;

use crate::outcome::OutcomeStatus;

/// Failure raised by a handler while executing a message.
///
/// Displays as exactly its message text, which is what the bus forwards to
/// the caller. The optional source is kept for logging and never leaks into
/// the outcome.
#[derive(Debug)]
pub struct HandlerError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl HandlerError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error with the given message, wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The failure text forwarded to the caller.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.source {
            Some(e) => Some(e.as_ref()),
            None => None,
        }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        HandlerError::new(message)
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        HandlerError::new(message)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::with_source(err.to_string(), err)
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        HandlerError::with_source(err.to_string(), err)
    }
}

/// Error raised along the resolve → lookup → invoke path.
#[derive(Debug, Error)]
pub enum BusError {
    /// Envelope or argument payload is not well-formed.
    #[error("invalid message payload: {0}")]
    Parse(String),
    /// The message shape has fields but no arguments were supplied.
    #[error("Message {0} requires arguments")]
    MissingArguments(String),
    /// No message shape is registered under this name.
    #[error("Message {0} not found")]
    MessageNotFound(String),
    /// The message shape is registered but no handler is bound to it.
    #[error("Handler for message {0} not found")]
    HandlerNotFound(String),
    /// Arguments were present but empty, so nothing was materialized.
    #[error("Message {0} resolved to nothing")]
    EmptyMessage(String),
    /// The handler itself failed.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl From<serde_json::Error> for BusError {
    fn from(err: serde_json::Error) -> Self {
        BusError::Parse(err.to_string())
    }
}

impl BusError {
    /// Outcome class for this error.
    pub fn status(&self) -> OutcomeStatus {
        match self {
            BusError::MessageNotFound(_) | BusError::HandlerNotFound(_) => OutcomeStatus::NotFound,
            BusError::Parse(_)
            | BusError::MissingArguments(_)
            | BusError::EmptyMessage(_)
            | BusError::Handler(_) => OutcomeStatus::HandlerError,
        }
    }

    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        self.status().status_code()
    }
}

/// Conflict detected while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two shapes claim the same message name.
    #[error("message name {name} is claimed by both {first} and {second}")]
    DuplicateMessage {
        name: String,
        first: &'static str,
        second: &'static str,
    },
    /// A message shape already has a handler.
    #[error("message {message} already has handler {existing}, cannot bind {rejected}")]
    DuplicateHandler {
        message: String,
        existing: &'static str,
        rejected: &'static str,
    },
    /// A handler type is already bound to another message shape.
    #[error("handler {handler} is already bound to {bound}, cannot bind it to {requested}")]
    HandlerAlreadyBound {
        handler: &'static str,
        bound: String,
        requested: String,
    },
    /// A handler is bound to a shape the type registry does not know.
    #[error("handler {handler} is bound to {message}, which is not a registered message")]
    UnregisteredMessage {
        message: String,
        handler: &'static str,
    },
}
