//! Message resolution: envelope text to a typed message instance.

use std::fmt;

use crate::envelope::Envelope;
use crate::error::BusError;
use crate::handler::AnyMessage;
use crate::message::Message;
use crate::registry::{MessageDescriptor, TypeRegistry};

/// A materialized message together with the descriptor it was resolved by.
///
/// Owned by the request that created it; consumed by the handler.
pub struct ResolvedMessage<'r> {
    descriptor: &'r MessageDescriptor,
    message: AnyMessage,
}

impl<'r> ResolvedMessage<'r> {
    pub fn descriptor(&self) -> &'r MessageDescriptor {
        self.descriptor
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    /// Borrow the message as its concrete shape.
    pub fn downcast_ref<M: Message>(&self) -> Option<&M> {
        self.message.downcast_ref::<M>()
    }

    /// Take the message as its concrete shape, or get `self` back.
    pub fn into_message<M: Message>(self) -> Result<M, Self> {
        let descriptor = self.descriptor;
        self.message
            .downcast::<M>()
            .map(|m| *m)
            .map_err(|message| Self {
                descriptor,
                message,
            })
    }

    pub(crate) fn into_parts(self) -> (&'r MessageDescriptor, AnyMessage) {
        (self.descriptor, self.message)
    }
}

impl fmt::Debug for ResolvedMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedMessage")
            .field("name", &self.descriptor.name())
            .finish_non_exhaustive()
    }
}

/// Turns envelopes into typed messages using a [`TypeRegistry`].
///
/// Argument handling:
///
/// | `args`            | zero-field shape | shape with fields     |
/// |-------------------|------------------|-----------------------|
/// | absent / `null`   | materialized     | `MissingArguments`    |
/// | `""` (blank)      | materialized     | `Ok(None)`            |
/// | JSON text         | decoded          | decoded               |
/// | malformed         | `Parse`          | `Parse`               |
#[derive(Debug, Clone, Copy)]
pub struct MessageResolver<'r> {
    types: &'r TypeRegistry,
}

impl<'r> MessageResolver<'r> {
    pub fn new(types: &'r TypeRegistry) -> Self {
        Self { types }
    }

    /// Parse envelope JSON and resolve it.
    pub fn resolve(&self, envelope_json: &str) -> Result<Option<ResolvedMessage<'r>>, BusError> {
        let envelope = Envelope::parse(envelope_json)?;
        self.resolve_envelope(&envelope)
    }

    /// Resolve an already-parsed envelope.
    pub fn resolve_envelope(
        &self,
        envelope: &Envelope,
    ) -> Result<Option<ResolvedMessage<'r>>, BusError> {
        let descriptor = self.types.lookup(&envelope.name)?;
        tracing::debug!(
            message_name = %descriptor.name(),
            kind = descriptor.kind().as_str(),
            "resolving message"
        );

        let decoded = match envelope.args.as_deref() {
            None => match descriptor.decode_empty() {
                Some(decoded) => decoded,
                None => return Err(BusError::MissingArguments(envelope.name.clone())),
            },
            Some(args) if args.trim().is_empty() => match descriptor.decode_empty() {
                Some(decoded) => decoded,
                None => {
                    tracing::debug!(message_name = %descriptor.name(), "blank arguments, nothing resolved");
                    return Ok(None);
                }
            },
            Some(args) => descriptor.decode(args),
        };

        let message = decoded?;
        Ok(Some(ResolvedMessage {
            descriptor,
            message,
        }))
    }
}
