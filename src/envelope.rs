//! Wire-level wrapper carrying a message name and its serialized arguments.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BusError;
use crate::message::Message;

/// The JSON envelope accepted by [`MessageBus::execute`](crate::MessageBus::execute).
///
/// `args` is itself JSON text, embedded as a string:
///
/// ```json
/// { "name": "SampleQuery", "args": "{\"foo\":\"bar\"}" }
/// ```
///
/// The canonical form produced by [`to_json`](crate::to_json) is accepted as
/// well, with the message fields inline under the message name:
///
/// ```json
/// { "SampleQuery": { "foo": "bar" } }
/// ```
///
/// Parsing is strict. An object holding `name` or `args` must have a string
/// `name`, an optional string `args`, and no other keys. Any other object
/// must have exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Registered message name.
    pub name: String,
    /// Serialized message fields. `None` when the key is absent or null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

impl Envelope {
    /// An envelope without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: None,
        }
    }

    /// Set the serialized arguments.
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Build the envelope for a typed message.
    pub fn for_message<M: Message>(message: &M) -> Result<Self, serde_json::Error> {
        Ok(Self::new(M::NAME).with_args(serde_json::to_string(message)?))
    }

    /// Parse envelope JSON, in either form. Anything else fails with
    /// [`BusError::Parse`].
    pub fn parse(text: &str) -> Result<Self, BusError> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(map) if is_canonical(&map) => {
                let (name, fields) = map
                    .into_iter()
                    .next()
                    .ok_or_else(|| BusError::Parse("empty message object".to_string()))?;
                Ok(Self::new(name).with_args(fields.to_string()))
            }
            other => Ok(serde_json::from_value(other)?),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// `{"<Name>": <fields>}`: a single key that is not an envelope field.
fn is_canonical(map: &serde_json::Map<String, Value>) -> bool {
    map.len() == 1 && !map.contains_key("name") && !map.contains_key("args")
}
