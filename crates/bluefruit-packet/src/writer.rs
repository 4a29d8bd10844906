use std::io::{ErrorKind, Write};

use bluefruit_transport::TransportError;
use bytes::BytesMut;
use tracing::trace;

use crate::error::{PacketError, Result};
use crate::packet::Packet;

const INITIAL_BUFFER_CAPACITY: usize = 64;

/// Writes encoded packets to any `Write` stream.
pub struct PacketWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> PacketWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode and write one packet (blocking), then flush.
    pub fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        self.buf.clear();
        packet.encode(&mut self.buf);
        trace!(header = %packet.header(), frame = ?self.buf.as_ref(), "writing packet");

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(io_error(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(io_error(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(io_error(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn io_error(err: std::io::Error) -> PacketError {
    PacketError::Transport(TransportError::Io(err))
}
