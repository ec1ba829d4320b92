//! Message bus: resolve, look up, invoke, report.

use serde_json::Value;

use super::builder::BusBuilder;
use crate::envelope::Envelope;
use crate::error::{BusError, RegistryError};
use crate::message::Message;
use crate::outcome::{Outcome, OutcomeStatus};
use crate::registry::{HandlerRegistry, ShapeId, TypeRegistry};
use crate::resolver::MessageResolver;
use crate::stream::RawStream;

/// The dispatcher tying message resolution and handler invocation together.
///
/// Holds no mutable state after construction, so a single bus can be shared
/// behind an `Arc` by any number of concurrent requests. Each request gets
/// its own message instance and a freshly built handler.
///
/// ## Example
///
/// ```ignore
/// let bus = MessageBus::builder()
///     .command(SampleCommandHandler::default)
///     .query(SampleQueryHandler::default)
///     .build()?;
///
/// let outcome = bus
///     .execute(r#"{"name":"SampleQuery","args":"{\"foo\":\"bar\"}"}"#)
///     .await;
/// assert_eq!(outcome.status, OutcomeStatus::Ok);
/// ```
#[derive(Debug)]
pub struct MessageBus {
    types: TypeRegistry,
    handlers: HandlerRegistry,
}

impl MessageBus {
    /// Combine separately built registries. Every handler binding must
    /// target a shape registered in `types`.
    pub fn new(types: TypeRegistry, handlers: HandlerRegistry) -> Result<Self, RegistryError> {
        if let Some(orphan) = handlers
            .bindings()
            .into_iter()
            .find(|binding| types.by_shape(binding.shape()).is_none())
        {
            return Err(RegistryError::UnregisteredMessage {
                message: orphan.message_name().to_string(),
                handler: orphan.handler_type(),
            });
        }
        Ok(Self { types, handlers })
    }

    /// Register message shapes and their handlers in one place.
    pub fn builder() -> BusBuilder {
        BusBuilder::default()
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Registered message names, sorted.
    pub fn messages(&self) -> Vec<&'static str> {
        self.types.names()
    }

    pub fn resolver(&self) -> MessageResolver<'_> {
        MessageResolver::new(&self.types)
    }

    /// Execute a JSON envelope (`{"name": ..., "args": ...}`) or a message in
    /// canonical form (`{"<Name>": {...}}`).
    pub async fn execute(&self, envelope_json: &str) -> Outcome {
        let result = match Envelope::parse(envelope_json) {
            Ok(envelope) => self.dispatch(&envelope, None).await,
            Err(err) => Err(err),
        };
        finish(result)
    }

    /// Execute a message accompanied by a binary stream.
    ///
    /// `message` is either a JSON object in one of the envelope forms or a
    /// bare message name, as carried by the transport's `Message` header. The stream is
    /// handed to stream-capable handlers and dropped otherwise.
    pub async fn execute_with_stream(&self, message: &str, stream: RawStream) -> Outcome {
        tracing::debug!(bytes = stream.len(), label = stream.label(), "message carries a stream");
        let result = match envelope_from_header(message) {
            Ok(envelope) => self.dispatch(&envelope, Some(stream)).await,
            Err(err) => Err(err),
        };
        finish(result)
    }

    /// Dispatch an already-typed message, skipping envelope resolution.
    pub async fn send<M: Message>(&self, message: M) -> Outcome {
        let result = self.dispatch_typed(message, None).await;
        finish(result)
    }

    /// Dispatch an already-typed message with a stream.
    pub async fn send_with_stream<M: Message>(&self, message: M, stream: RawStream) -> Outcome {
        let result = self.dispatch_typed(message, Some(stream)).await;
        finish(result)
    }

    async fn dispatch(
        &self,
        envelope: &Envelope,
        stream: Option<RawStream>,
    ) -> Result<Option<Value>, BusError> {
        let resolved = self
            .resolver()
            .resolve_envelope(envelope)?
            .ok_or_else(|| BusError::EmptyMessage(envelope.name.clone()))?;

        let binding = self.handlers.binding_for(resolved.descriptor())?;
        let (descriptor, message) = resolved.into_parts();

        tracing::debug!(
            message_name = %descriptor.name(),
            handler = binding.handler_type(),
            "dispatching message"
        );
        Ok(binding.invoke(message, stream).await?)
    }

    async fn dispatch_typed<M: Message>(
        &self,
        message: M,
        stream: Option<RawStream>,
    ) -> Result<Option<Value>, BusError> {
        let descriptor = self
            .types
            .by_shape(ShapeId::of::<M>())
            .ok_or_else(|| BusError::MessageNotFound(M::NAME.to_string()))?;
        let binding = self.handlers.binding_for(descriptor)?;

        tracing::debug!(
            message_name = %descriptor.name(),
            handler = binding.handler_type(),
            "dispatching typed message"
        );
        Ok(binding.invoke(Box::new(message), stream).await?)
    }
}

/// The single place where dispatch failures become outcomes.
fn finish(result: Result<Option<Value>, BusError>) -> Outcome {
    match result {
        Ok(value) => {
            tracing::debug!("message handled");
            Outcome::ok(value)
        }
        Err(err) => {
            let outcome = Outcome::from_error(&err);
            match outcome.status {
                OutcomeStatus::NotFound => tracing::warn!(error = %err, "message not dispatched"),
                _ => tracing::warn!(error = %err, "message failed"),
            }
            outcome
        }
    }
}

fn envelope_from_header(message: &str) -> Result<Envelope, BusError> {
    let message = message.trim();
    if message.starts_with('{') {
        Envelope::parse(message)
    } else {
        Ok(Envelope::new(message))
    }
}
