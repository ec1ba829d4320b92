//! Type registry: the set of message shapes known to the bus.

use std::collections::{BTreeMap, HashMap};

use super::descriptor::{MessageDescriptor, ShapeId};
use crate::error::{BusError, RegistryError};
use crate::message::{Command, Query};

/// Name → descriptor map, immutable once built.
///
/// Iteration order is the name order, so the registry is identical for a
/// given set of shapes no matter the order they were registered in.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_name: BTreeMap<&'static str, MessageDescriptor>,
    by_shape: HashMap<ShapeId, &'static str>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// All registered descriptors, sorted by name.
    pub fn list_shapes(&self) -> Vec<&MessageDescriptor> {
        self.by_name.values().collect()
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.by_name.keys().copied().collect()
    }

    pub fn get(&self, name: &str) -> Option<&MessageDescriptor> {
        self.by_name.get(name)
    }

    /// Like [`get`](Self::get), failing with [`BusError::MessageNotFound`].
    pub fn lookup(&self, name: &str) -> Result<&MessageDescriptor, BusError> {
        self.get(name)
            .ok_or_else(|| BusError::MessageNotFound(name.to_string()))
    }

    pub fn by_shape(&self, shape: ShapeId) -> Option<&MessageDescriptor> {
        self.by_shape
            .get(&shape)
            .and_then(|name| self.by_name.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Collects message shapes, then validates them in [`build`](Self::build).
///
/// Uses the builder pattern: each method returns `self` for chaining.
///
/// ```ignore
/// let types = TypeRegistry::builder()
///     .command::<SampleCommand>()
///     .query::<SampleQuery>()
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    descriptors: Vec<MessageDescriptor>,
}

impl TypeRegistryBuilder {
    pub fn command<C: Command>(mut self) -> Self {
        self.push(MessageDescriptor::command::<C>());
        self
    }

    pub fn query<Q: Query>(mut self) -> Self {
        self.push(MessageDescriptor::query::<Q>());
        self
    }

    pub fn descriptor(mut self, descriptor: MessageDescriptor) -> Self {
        self.push(descriptor);
        self
    }

    pub(crate) fn push(&mut self, descriptor: MessageDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Build the registry. Fails if two descriptors share a name.
    pub fn build(self) -> Result<TypeRegistry, RegistryError> {
        let mut registry = TypeRegistry::default();

        for descriptor in self.descriptors {
            if let Some(existing) = registry.by_name.get(descriptor.name()) {
                return Err(RegistryError::DuplicateMessage {
                    name: descriptor.name().to_string(),
                    first: existing.shape().type_name(),
                    second: descriptor.shape().type_name(),
                });
            }
            registry.by_shape.insert(descriptor.shape(), descriptor.name());
            registry.by_name.insert(descriptor.name(), descriptor);
        }

        tracing::info!(messages = registry.len(), "type registry built");
        Ok(registry)
    }
}
