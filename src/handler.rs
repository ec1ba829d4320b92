//! Handler capabilities and their type-erased form.
//!
//! Handlers implement one of three capabilities, each bound to exactly one
//! message shape through an associated type:
//!
//! - [`CommandHandler`]: executes a [`Command`], returns nothing
//! - [`QueryHandler`]: executes a [`Query`], returns `Q::Response`
//! - [`StreamCommandHandler`]: executes a [`Command`] that carries a
//!   [`RawStream`] side-channel
//!
//! Internally every binding is erased into [`ErasedHandler`], which takes a
//! boxed message and yields an optional JSON value, so the bus can invoke all
//! three uniformly while the [`HandlerKind`] tag keeps the distinction.

use std::any::Any;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HandlerError;
use crate::message::{Command, Message, Query};
use crate::stream::RawStream;

/// Executes a command.
///
/// ```ignore
/// #[derive(Default)]
/// struct SampleCommandHandler;
///
/// #[async_trait]
/// impl CommandHandler for SampleCommandHandler {
///     type Command = SampleCommand;
///
///     async fn handle(&self, command: SampleCommand) -> Result<(), HandlerError> {
///         tracing::info!(foo = %command.foo, "sample command handled");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    type Command: Command;

    async fn handle(&self, command: Self::Command) -> Result<(), HandlerError>;
}

/// Executes a query and returns its response.
#[async_trait]
pub trait QueryHandler: Send + Sync + 'static {
    type Query: Query;

    async fn handle(
        &self,
        query: Self::Query,
    ) -> Result<<Self::Query as Query>::Response, HandlerError>;
}

/// Executes a command together with the binary stream that accompanied it.
#[async_trait]
pub trait StreamCommandHandler: Send + Sync + 'static {
    type Command: Command;

    async fn handle(&self, command: Self::Command, stream: RawStream) -> Result<(), HandlerError>;
}

/// Which capability a bound handler implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Command,
    Query,
    StreamCommand,
}

impl HandlerKind {
    /// Whether the handler receives the request's raw stream.
    pub fn accepts_stream(self) -> bool {
        matches!(self, HandlerKind::StreamCommand)
    }

    /// Whether the handler produces a value.
    pub fn returns_value(self) -> bool {
        matches!(self, HandlerKind::Query)
    }
}

/// A resolved message with its concrete type erased.
pub(crate) type AnyMessage = Box<dyn Any + Send>;

/// Object-safe invocation contract shared by all capabilities.
#[async_trait]
pub(crate) trait ErasedHandler: Send + Sync {
    async fn invoke(
        &self,
        message: AnyMessage,
        stream: Option<RawStream>,
    ) -> Result<Option<Value>, HandlerError>;
}

fn downcast<M: Message>(message: AnyMessage) -> Result<M, HandlerError> {
    message
        .downcast::<M>()
        .map(|m| *m)
        .map_err(|_| HandlerError::new(format!("message is not a {}", M::NAME)))
}

/// Erased command binding. Builds a fresh handler per invocation.
pub(crate) struct CommandInvoker<H, F> {
    factory: F,
    _handler: PhantomData<fn() -> H>,
}

impl<H, F> CommandInvoker<H, F> {
    pub(crate) fn new(factory: F) -> Self {
        Self {
            factory,
            _handler: PhantomData,
        }
    }
}

#[async_trait]
impl<H, F> ErasedHandler for CommandInvoker<H, F>
where
    H: CommandHandler,
    F: Fn() -> H + Send + Sync + 'static,
{
    async fn invoke(
        &self,
        message: AnyMessage,
        stream: Option<RawStream>,
    ) -> Result<Option<Value>, HandlerError> {
        drop(stream);
        let command = downcast::<H::Command>(message)?;
        let handler = (self.factory)();
        handler.handle(command).await?;
        Ok(None)
    }
}

/// Erased query binding. Serializes the typed response to JSON.
pub(crate) struct QueryInvoker<H, F> {
    factory: F,
    _handler: PhantomData<fn() -> H>,
}

impl<H, F> QueryInvoker<H, F> {
    pub(crate) fn new(factory: F) -> Self {
        Self {
            factory,
            _handler: PhantomData,
        }
    }
}

#[async_trait]
impl<H, F> ErasedHandler for QueryInvoker<H, F>
where
    H: QueryHandler,
    F: Fn() -> H + Send + Sync + 'static,
{
    async fn invoke(
        &self,
        message: AnyMessage,
        stream: Option<RawStream>,
    ) -> Result<Option<Value>, HandlerError> {
        drop(stream);
        let query = downcast::<H::Query>(message)?;
        let handler = (self.factory)();
        let response = handler.handle(query).await?;
        Ok(Some(serde_json::to_value(&response)?))
    }
}

/// Erased stream-command binding. A missing stream is passed as empty.
pub(crate) struct StreamCommandInvoker<H, F> {
    factory: F,
    _handler: PhantomData<fn() -> H>,
}

impl<H, F> StreamCommandInvoker<H, F> {
    pub(crate) fn new(factory: F) -> Self {
        Self {
            factory,
            _handler: PhantomData,
        }
    }
}

#[async_trait]
impl<H, F> ErasedHandler for StreamCommandInvoker<H, F>
where
    H: StreamCommandHandler,
    F: Fn() -> H + Send + Sync + 'static,
{
    async fn invoke(
        &self,
        message: AnyMessage,
        stream: Option<RawStream>,
    ) -> Result<Option<Value>, HandlerError> {
        let command = downcast::<H::Command>(message)?;
        let handler = (self.factory)();
        handler.handle(command, stream.unwrap_or_default()).await?;
        Ok(None)
    }
}
