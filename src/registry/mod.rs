//! Registries built once at startup and read-only afterwards.
//!
//! - [`TypeRegistry`]: message name → [`MessageDescriptor`]
//! - [`HandlerRegistry`]: message shape → [`HandlerBinding`]
//!
//! Both are populated explicitly through builders; conflicting
//! registrations fail at `build()` rather than at dispatch time.

mod descriptor;
mod handlers;
mod types;

pub use descriptor::{MessageDescriptor, ShapeId};
pub use handlers::{HandlerBinding, HandlerRegistry, HandlerRegistryBuilder};
pub use types::{TypeRegistry, TypeRegistryBuilder};

pub(crate) use handlers::{command_binding, query_binding, stream_command_binding};
