use bluefruit_transport::ByteSource;
use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::error::{PacketError, Result};
use crate::header::{TypeHeader, START_MARKER};
use crate::packet::Packet;
use crate::registry::{self, Framing, PacketRegistry};

/// Reads packets from a live byte stream.
///
/// Each call scans for a `!` start marker, resolves the header through the
/// registry and reads exactly the rest of that variant's frame, leaving any
/// following bytes in the source for the next call. No state carries over
/// between calls: a rejected frame is dropped and the next call starts
/// scanning afresh.
pub struct PacketReader<'r, S> {
    source: S,
    registry: &'r PacketRegistry,
}

impl<S: ByteSource> PacketReader<'static, S> {
    /// Create a reader resolving headers through the process-wide registry.
    pub fn new(source: S) -> Self {
        Self::with_registry(source, registry::global())
    }
}

impl<'r, S: ByteSource> PacketReader<'r, S> {
    /// Create a reader resolving headers through `registry`.
    pub fn with_registry(source: S, registry: &'r PacketRegistry) -> Self {
        Self { source, registry }
    }

    /// Read the next packet.
    ///
    /// Returns `Ok(None)` when the source timed out before a packet started;
    /// callers should poll again. Bytes before a start marker are returned
    /// as a raw text packet (the marker byte plus the rest of the line) when
    /// raw text is registered, and silently skipped otherwise.
    ///
    /// A source timeout after the header was read is reported as
    /// [`PacketError::IncompleteFrame`].
    pub fn read_packet(&mut self) -> Result<Option<Packet>> {
        let header = loop {
            let start = self.source.read(1)?;
            let Some(&byte) = start.first() else {
                return Ok(None);
            };

            if byte == START_MARKER {
                let selector = self.source.read(1)?;
                let Some(&selector) = selector.first() else {
                    return Ok(None);
                };
                break TypeHeader::from_bytes([byte, selector]);
            }

            if let Some(packet) = self.read_raw_text(byte)? {
                return Ok(Some(packet));
            }
            debug!(byte, "skipping byte outside packet frame");
        };

        let registry = self.registry;
        let descriptor = registry
            .lookup(header)
            .ok_or(PacketError::UnregisteredType(header))?;
        let length = match descriptor.framing {
            Framing::Fixed { length, .. } => length,
            Framing::Line { .. } => return Err(PacketError::NotFramed(header)),
        };

        let mut frame = BytesMut::with_capacity(length);
        frame.put_slice(header.as_bytes());
        while frame.len() < length {
            let chunk = self.source.read(length - frame.len())?;
            if chunk.is_empty() {
                return Err(PacketError::IncompleteFrame {
                    header,
                    expected: length,
                    received: frame.len(),
                });
            }
            frame.extend_from_slice(&chunk);
        }

        trace!(%header, frame = ?frame.as_ref(), "read frame");
        registry.decode(&frame).map(Some)
    }

    fn read_raw_text(&mut self, first: u8) -> Result<Option<Packet>> {
        let registry = self.registry;
        let Some(descriptor) = registry.lookup(TypeHeader::RAW_TEXT) else {
            return Ok(None);
        };
        let Framing::Line { construct } = descriptor.framing else {
            return Ok(None);
        };

        let mut line = BytesMut::with_capacity(64);
        line.put_u8(first);
        if first != b'\n' {
            line.extend_from_slice(&self.source.read_line()?);
        }
        trace!(line = ?line.as_ref(), "read raw text line");
        Ok(Some(construct(line.freeze())))
    }

    /// The registry used to resolve headers.
    pub fn registry(&self) -> &'r PacketRegistry {
        self.registry
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> S {
        self.source
    }
}
