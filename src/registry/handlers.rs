//! Handler registry: binds each message shape to its unique handler.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::descriptor::{MessageDescriptor, ShapeId};
use crate::error::{BusError, HandlerError, RegistryError};
use crate::handler::{
    AnyMessage, CommandHandler, CommandInvoker, ErasedHandler, HandlerKind, QueryHandler,
    QueryInvoker, StreamCommandHandler, StreamCommandInvoker,
};
use crate::message::Message;
use crate::stream::RawStream;

/// A message shape bound to the handler responsible for it.
pub struct HandlerBinding {
    message: &'static str,
    shape: ShapeId,
    handler: ShapeId,
    kind: HandlerKind,
    invoker: Box<dyn ErasedHandler>,
}

impl HandlerBinding {
    fn new<M: Message, H: 'static>(kind: HandlerKind, invoker: Box<dyn ErasedHandler>) -> Self {
        Self {
            message: M::NAME,
            shape: ShapeId::of::<M>(),
            handler: ShapeId::of::<H>(),
            kind,
            invoker,
        }
    }

    /// Name of the bound message.
    pub fn message_name(&self) -> &'static str {
        self.message
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Type name of the handler implementation.
    pub fn handler_type(&self) -> &'static str {
        self.handler.type_name()
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    /// Build a fresh handler and run it against `message`.
    pub(crate) async fn invoke(
        &self,
        message: AnyMessage,
        stream: Option<RawStream>,
    ) -> Result<Option<Value>, HandlerError> {
        self.invoker.invoke(message, stream).await
    }
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("message", &self.message)
            .field("handler", &self.handler)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Shape → handler map, immutable once built.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    bindings: HashMap<ShapeId, HandlerBinding>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// The binding for a described message, failing with
    /// [`BusError::HandlerNotFound`] when none is registered.
    pub fn binding_for(&self, descriptor: &MessageDescriptor) -> Result<&HandlerBinding, BusError> {
        self.get(descriptor.shape())
            .ok_or_else(|| BusError::HandlerNotFound(descriptor.name().to_string()))
    }

    pub fn get(&self, shape: ShapeId) -> Option<&HandlerBinding> {
        self.bindings.get(&shape)
    }

    /// All bindings, sorted by message name.
    pub fn bindings(&self) -> Vec<&HandlerBinding> {
        let mut bindings: Vec<_> = self.bindings.values().collect();
        bindings.sort_by_key(|b| b.message);
        bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Collects handler bindings, then validates them in [`build`](Self::build).
///
/// Each binding takes a factory that produces a handler per request:
///
/// ```ignore
/// let handlers = HandlerRegistry::builder()
///     .command(SampleCommandHandler::default)
///     .query(|| SampleQueryHandler::new(clock.clone()))
///     .build()?;
/// ```
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    bindings: Vec<HandlerBinding>,
}

impl HandlerRegistryBuilder {
    /// Bind a command handler.
    pub fn command<H, F>(mut self, factory: F) -> Self
    where
        H: CommandHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.push(command_binding(factory));
        self
    }

    /// Bind a query handler.
    pub fn query<H, F>(mut self, factory: F) -> Self
    where
        H: QueryHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.push(query_binding(factory));
        self
    }

    /// Bind a command handler that receives the request's raw stream.
    pub fn stream_command<H, F>(mut self, factory: F) -> Self
    where
        H: StreamCommandHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.push(stream_command_binding(factory));
        self
    }

    pub(crate) fn push(&mut self, binding: HandlerBinding) {
        self.bindings.push(binding);
    }

    /// Build the registry. Fails if a shape has two handlers or a handler
    /// type is bound to two shapes.
    pub fn build(self) -> Result<HandlerRegistry, RegistryError> {
        let mut registry = HandlerRegistry::default();
        let mut bound_handlers: HashMap<ShapeId, &'static str> = HashMap::new();

        for binding in self.bindings {
            if let Some(existing) = registry.bindings.get(&binding.shape) {
                return Err(RegistryError::DuplicateHandler {
                    message: binding.message.to_string(),
                    existing: existing.handler_type(),
                    rejected: binding.handler_type(),
                });
            }
            if let Some(bound) = bound_handlers.insert(binding.handler, binding.message) {
                return Err(RegistryError::HandlerAlreadyBound {
                    handler: binding.handler_type(),
                    bound: bound.to_string(),
                    requested: binding.message.to_string(),
                });
            }
            registry.bindings.insert(binding.shape, binding);
        }

        tracing::info!(handlers = registry.len(), "handler registry built");
        Ok(registry)
    }
}

impl fmt::Debug for HandlerRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistryBuilder")
            .field("bindings", &self.bindings)
            .finish()
    }
}

pub(crate) fn command_binding<H, F>(factory: F) -> HandlerBinding
where
    H: CommandHandler,
    F: Fn() -> H + Send + Sync + 'static,
{
    HandlerBinding::new::<H::Command, H>(
        HandlerKind::Command,
        Box::new(CommandInvoker::new(factory)),
    )
}

pub(crate) fn query_binding<H, F>(factory: F) -> HandlerBinding
where
    H: QueryHandler,
    F: Fn() -> H + Send + Sync + 'static,
{
    HandlerBinding::new::<H::Query, H>(HandlerKind::Query, Box::new(QueryInvoker::new(factory)))
}

pub(crate) fn stream_command_binding<H, F>(factory: F) -> HandlerBinding
where
    H: StreamCommandHandler,
    F: Fn() -> H + Send + Sync + 'static,
{
    HandlerBinding::new::<H::Command, H>(
        HandlerKind::StreamCommand,
        Box::new(StreamCommandInvoker::new(factory)),
    )
}
