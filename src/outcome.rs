//! The uniform result of a dispatch cycle.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BusError;

/// Terminal state of a dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeStatus {
    Ok,
    NotFound,
    HandlerError,
}

impl OutcomeStatus {
    /// HTTP-style status code consumed by transports.
    pub fn status_code(self) -> u16 {
        match self {
            OutcomeStatus::Ok => 200,
            OutcomeStatus::NotFound => 404,
            OutcomeStatus::HandlerError => 500,
        }
    }
}

/// Result of executing one envelope.
///
/// `value` is the serialized handler result (`None` for commands and for
/// failures). `message` is empty on success and carries the failure text
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: OutcomeStatus,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub message: String,
}

impl Outcome {
    /// A successful outcome carrying the handler's return value.
    pub fn ok(value: Option<Value>) -> Self {
        Self {
            status: OutcomeStatus::Ok,
            value,
            message: String::new(),
        }
    }

    /// A "not found" outcome.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::NotFound,
            value: None,
            message: message.into(),
        }
    }

    /// A generic failure outcome.
    pub fn handler_error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::HandlerError,
            value: None,
            message: message.into(),
        }
    }

    /// Convert a dispatch error into its outcome class.
    pub fn from_error(err: &BusError) -> Self {
        Self {
            status: err.status(),
            value: None,
            message: err.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == OutcomeStatus::Ok
    }

    /// HTTP-style status code for this outcome.
    pub fn status_code(&self) -> u16 {
        self.status.status_code()
    }

    /// Deserialize the carried value into a typed response.
    ///
    /// Returns `Ok(None)` when the outcome carries no value.
    pub fn value_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.value
            .as_ref()
            .map(|v| T::deserialize(v))
            .transpose()
    }
}

impl From<BusError> for Outcome {
    fn from(err: BusError) -> Self {
        Outcome::from_error(&err)
    }
}
