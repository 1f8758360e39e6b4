//! Attribute value buffers
//!
//! Peripheral stacks hand values over as streaming buffers and take writes
//! as detached, single-use buffers. `decode` and `encode` convert between
//! those and plain byte vectors. Payloads are opaque: no framing, no length
//! prefix, no validation.

use std::io::{self, Cursor, Read};

use log::warn;

/// A streaming buffer holding an attribute value received from a peripheral
#[derive(Debug, Clone, Default)]
pub struct AttributeBuffer {
    inner: Cursor<Vec<u8>>,
}

impl AttributeBuffer {
    pub fn new(value: Vec<u8>) -> Self {
        AttributeBuffer {
            inner: Cursor::new(value),
        }
    }

    /// Number of bytes not yet read.
    pub fn unconsumed_len(&self) -> usize {
        let total = self.inner.get_ref().len();
        let position = usize::try_from(self.inner.position()).unwrap_or(total);
        total.saturating_sub(position)
    }
}

impl From<Vec<u8>> for AttributeBuffer {
    fn from(value: Vec<u8>) -> Self {
        AttributeBuffer::new(value)
    }
}

impl From<&[u8]> for AttributeBuffer {
    fn from(value: &[u8]) -> Self {
        AttributeBuffer::new(value.to_vec())
    }
}

impl Read for AttributeBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// A detached buffer carrying the bytes of a single write
#[derive(Debug, PartialEq, Eq)]
pub struct WriteBuffer {
    bytes: Vec<u8>,
}

impl WriteBuffer {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the buffer, yielding its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Drains `buffer` into an owned byte vector.
pub fn decode(mut buffer: AttributeBuffer) -> Vec<u8> {
    let mut output = Vec::with_capacity(buffer.unconsumed_len());
    if let Err(err) = buffer.read_to_end(&mut output) {
        warn!("attribute buffer ended early after {} bytes: {}", output.len(), err);
    }
    output
}

/// Builds a write buffer containing exactly `bytes`.
pub fn encode(bytes: &[u8]) -> WriteBuffer {
    WriteBuffer {
        bytes: bytes.to_vec(),
    }
}
