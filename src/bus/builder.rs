//! One-stop registration of message shapes and handlers.

use super::bus::MessageBus;
use crate::error::RegistryError;
use crate::handler::{CommandHandler, QueryHandler, StreamCommandHandler};
use crate::message::{Command, Query};
use crate::registry::{
    command_binding, query_binding, stream_command_binding, HandlerRegistry,
    HandlerRegistryBuilder, MessageDescriptor, TypeRegistry, TypeRegistryBuilder,
};

/// Builds a [`MessageBus`] by registering each handler together with the
/// message shape it serves.
///
/// Uses the builder pattern: returns `self` for chaining. Conflicts
/// (duplicate names, duplicate bindings) are reported by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct BusBuilder {
    types: TypeRegistryBuilder,
    handlers: HandlerRegistryBuilder,
}

impl BusBuilder {
    /// Register `H::Command` and bind `H` to it.
    pub fn command<H, F>(mut self, factory: F) -> Self
    where
        H: CommandHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.types.push(MessageDescriptor::command::<H::Command>());
        self.handlers.push(command_binding(factory));
        self
    }

    /// Register `H::Query` and bind `H` to it.
    pub fn query<H, F>(mut self, factory: F) -> Self
    where
        H: QueryHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.types.push(MessageDescriptor::query::<H::Query>());
        self.handlers.push(query_binding(factory));
        self
    }

    /// Register `H::Command` and bind the stream-capable `H` to it.
    pub fn stream_command<H, F>(mut self, factory: F) -> Self
    where
        H: StreamCommandHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.types.push(MessageDescriptor::command::<H::Command>());
        self.handlers.push(stream_command_binding(factory));
        self
    }

    /// Register a command shape without binding a handler.
    pub fn declare_command<C: Command>(mut self) -> Self {
        self.types.push(MessageDescriptor::command::<C>());
        self
    }

    /// Register a query shape without binding a handler.
    pub fn declare_query<Q: Query>(mut self) -> Self {
        self.types.push(MessageDescriptor::query::<Q>());
        self
    }

    pub fn build(self) -> Result<MessageBus, RegistryError> {
        let types: TypeRegistry = self.types.build()?;
        let handlers: HandlerRegistry = self.handlers.build()?;
        MessageBus::new(types, handlers)
    }
}
