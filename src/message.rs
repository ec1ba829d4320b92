//! Message capability traits.
//!
//! A message shape is any serde-serializable type that declares a unique
//! name and one of two capabilities:
//!
//! - [`Command`]: an action with no meaningful return value
//! - [`Query`]: a request for a value of type [`Query::Response`]
//!
//! Both are usually derived:
//!
//! ```ignore
//! #[derive(Serialize, Deserialize, cqrs_bus::Command)]
//! struct SampleCommand {
//!     foo: String,
//! }
//!
//! #[derive(Serialize, Deserialize, cqrs_bus::Query)]
//! #[query(response = SampleQueryResponse)]
//! struct SampleQuery {
//!     foo: String,
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// A value that can travel through the bus.
///
/// `NAME` is the symbolic name used in envelopes. It is case-sensitive and
/// must be unique within a [`TypeRegistry`](crate::TypeRegistry).
pub trait Message: Serialize + DeserializeOwned + Send + 'static {
    /// The registered name of this message shape.
    const NAME: &'static str;

    /// Whether the shape declares any fields. Shapes without fields are
    /// materialized when an envelope carries no arguments; all others
    /// require them, even when every field is optional.
    const HAS_FIELDS: bool = true;
}

/// A message describing an action. Its handler returns nothing.
pub trait Command: Message {}

/// A message requesting a computed value.
pub trait Query: Message {
    /// The value produced by the query's handler.
    type Response: Serialize + Send + 'static;
}

/// Which capability a message shape declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Command,
    Query,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Command => "command",
            MessageKind::Query => "query",
        }
    }
}

/// Serialize a message in its canonical form: a single-key object keyed by
/// the message name.
///
/// ```ignore
/// let json = cqrs_bus::to_json(&SampleQuery { foo: "bar".into() })?;
/// assert_eq!(json, r#"{"SampleQuery":{"foo":"bar"}}"#);
/// ```
pub fn to_json<M: Message>(message: &M) -> Result<String, serde_json::Error> {
    let mut wrapper = Map::with_capacity(1);
    wrapper.insert(M::NAME.to_string(), serde_json::to_value(message)?);
    serde_json::to_string(&Value::Object(wrapper))
}
