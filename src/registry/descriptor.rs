//! Immutable records describing registered message shapes.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::message::{Command, Message, MessageKind, Query};

/// Structural identity of a Rust type.
///
/// Equality and hashing use the `TypeId`; the type name is kept for
/// diagnostics only.
#[derive(Clone, Copy)]
pub struct ShapeId {
    id: TypeId,
    name: &'static str,
}

impl ShapeId {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ShapeId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ShapeId {}

impl Hash for ShapeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type DecodeFn = fn(&str) -> Result<Box<dyn Any + Send>, serde_json::Error>;

fn decode_as<M: Message>(args: &str) -> Result<Box<dyn Any + Send>, serde_json::Error> {
    let message: M = serde_json::from_str(args)?;
    Ok(Box::new(message))
}

/// Argument texts tried for a field-less shape arriving without arguments:
/// an empty object for `struct S {}`, `null` for unit structs.
const EMPTY_ARGS: [&str; 2] = ["{}", "null"];

fn empty_args_for<M: Message>() -> Option<&'static str> {
    if M::HAS_FIELDS {
        return None;
    }
    EMPTY_ARGS
        .into_iter()
        .find(|args| serde_json::from_str::<M>(args).is_ok())
}

/// The registry's record of a message shape.
#[derive(Clone)]
pub struct MessageDescriptor {
    name: &'static str,
    kind: MessageKind,
    shape: ShapeId,
    response_shape: Option<ShapeId>,
    empty_args: Option<&'static str>,
    decode: DecodeFn,
}

impl MessageDescriptor {
    /// Describe a command shape.
    pub fn command<C: Command>() -> Self {
        Self::new::<C>(MessageKind::Command, None)
    }

    /// Describe a query shape and its response shape.
    pub fn query<Q: Query>() -> Self {
        Self::new::<Q>(MessageKind::Query, Some(ShapeId::of::<Q::Response>()))
    }

    fn new<M: Message>(kind: MessageKind, response_shape: Option<ShapeId>) -> Self {
        Self {
            name: M::NAME,
            kind,
            shape: ShapeId::of::<M>(),
            response_shape,
            empty_args: empty_args_for::<M>(),
            decode: decode_as::<M>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Present for queries, absent for commands.
    pub fn response_shape(&self) -> Option<ShapeId> {
        self.response_shape
    }

    /// Whether the shape cannot be materialized without arguments.
    pub fn requires_args(&self) -> bool {
        self.empty_args.is_none()
    }

    /// Deserialize `args` as this shape.
    pub(crate) fn decode(&self, args: &str) -> Result<Box<dyn Any + Send>, serde_json::Error> {
        (self.decode)(args)
    }

    /// Materialize the shape without arguments, if it has no required fields.
    pub(crate) fn decode_empty(&self) -> Option<Result<Box<dyn Any + Send>, serde_json::Error>> {
        self.empty_args.map(|args| self.decode(args))
    }
}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("shape", &self.shape)
            .field("response_shape", &self.response_shape)
            .field("requires_args", &self.requires_args())
            .finish()
    }
}
