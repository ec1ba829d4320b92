//! Request-scoped binary side-channel.

use std::io::{self, Cursor, Read};

/// Binary payload accompanying a message, e.g. an uploaded file.
///
/// The stream is owned by the dispatch cycle: it is moved into a
/// stream-capable handler or dropped by the bus, so it never outlives the
/// request on any path.
#[derive(Debug, Default, Clone)]
pub struct RawStream {
    label: Option<String>,
    data: Cursor<Vec<u8>>,
}

impl RawStream {
    /// Wrap fully-buffered bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: None,
            data: Cursor::new(bytes.into()),
        }
    }

    /// An empty stream.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach an out-of-band label (file name, content type, ...).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Total size in bytes, independent of the read position.
    pub fn len(&self) -> usize {
        self.data.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.get_ref().is_empty()
    }

    /// Bytes not yet consumed through [`Read`].
    pub fn remaining(&self) -> usize {
        let position = usize::try_from(self.data.position()).unwrap_or(usize::MAX);
        self.len().saturating_sub(position)
    }

    /// All bytes, regardless of the read position.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.get_ref()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data.into_inner()
    }
}

impl Read for RawStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl From<Vec<u8>> for RawStream {
    fn from(bytes: Vec<u8>) -> Self {
        RawStream::new(bytes)
    }
}

impl From<&[u8]> for RawStream {
    fn from(bytes: &[u8]) -> Self {
        RawStream::new(bytes)
    }
}
