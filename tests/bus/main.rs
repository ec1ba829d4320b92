//! Message bus integration tests.

mod support;
mod resolve;
mod stream;
