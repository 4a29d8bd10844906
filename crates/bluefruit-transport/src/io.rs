use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::config::LinkConfig;
use crate::error::{Result, TransportError};
use crate::traits::ByteSource;

const INITIAL_BUFFER_CAPACITY: usize = 256;
const READ_CHUNK_SIZE: usize = 256;

/// Adapts any `Read` stream into a [`ByteSource`].
///
/// `WouldBlock`, `TimedOut` and end-of-stream all end the current call with
/// whatever has been collected so far. `Interrupted` reads are retried. Bytes
/// pulled from the stream beyond what a call returns stay buffered for the
/// next call, so nothing is lost between frames.
pub struct IoSource<R> {
    inner: R,
    buf: BytesMut,
    max_line_length: usize,
    closed: bool,
}

impl<R: Read> IoSource<R> {
    /// Create a new source with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, &LinkConfig::default())
    }

    /// Create a new source with explicit configuration.
    ///
    /// The read timeout is a property of the stream itself and must already be
    /// applied by whoever opened it; see [`crate::link`] and [`crate::background`].
    pub fn with_config(inner: R, config: &LinkConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            max_line_length: config.max_line_length.max(1),
            closed: false,
        }
    }

    /// True once the underlying stream has reported end-of-stream.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of bytes read from the stream but not yet handed out.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the source and return the inner stream.
    ///
    /// Buffered bytes that were not handed out yet are dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }

    // Pulls at most `want` bytes. Returns false on timeout or end-of-stream.
    fn fill(&mut self, want: usize) -> Result<bool> {
        if self.closed {
            return Ok(false);
        }

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let want = want.clamp(1, READ_CHUNK_SIZE);
        loop {
            match self.inner.read(&mut chunk[..want]) {
                Ok(0) => {
                    debug!("byte source reached end of stream");
                    self.closed = true;
                    return Ok(false);
                }
                Ok(n) => {
                    trace!(bytes = n, "byte source read");
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(true);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(false);
                }
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read(&mut self, n: usize) -> Result<Bytes> {
        while self.buf.len() < n {
            if !self.fill(n - self.buf.len())? {
                break;
            }
        }
        let take = n.min(self.buf.len());
        Ok(self.buf.split_to(take).freeze())
    }

    fn read_line(&mut self) -> Result<Bytes> {
        let mut scanned = 0usize;
        loop {
            if let Some(pos) = self.buf[scanned..].iter().position(|&b| b == b'\n') {
                let end = (scanned + pos + 1).min(self.max_line_length);
                return Ok(self.buf.split_to(end).freeze());
            }
            scanned = self.buf.len();
            if scanned >= self.max_line_length {
                break;
            }
            if !self.fill(self.max_line_length - scanned)? {
                break;
            }
        }
        let take = self.buf.len().min(self.max_line_length);
        Ok(self.buf.split_to(take).freeze())
    }
}

impl<R> std::fmt::Debug for IoSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoSource")
            .field("buffered", &self.buf.len())
            .field("max_line_length", &self.max_line_length)
            .field("closed", &self.closed)
            .finish()
    }
}
