//! Timeouts for streams that cannot carry one.
//!
//! Pipes and terminals (stdin in particular) block until data or EOF arrive
//! and ignore signals that were given a handler. [`spawn_reader`] moves the
//! blocking reads onto a helper thread and hands chunks back over a channel,
//! so the consuming side gets the same timeout semantics as a socket link.

use std::io::{self, ErrorKind, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::LinkConfig;
use crate::io::IoSource;

const READ_CHUNK_SIZE: usize = 256;

/// Receiving half of a reader thread. Implements `Read`.
///
/// A read that waits longer than the timeout fails with `WouldBlock`. Once
/// the thread has seen end-of-stream and every chunk is consumed, reads
/// return `Ok(0)`.
#[derive(Debug)]
pub struct ChannelReader {
    chunks: Receiver<io::Result<Vec<u8>>>,
    pending: Vec<u8>,
    offset: usize,
    timeout: Option<Duration>,
}

impl ChannelReader {
    fn next_chunk(&mut self) -> io::Result<bool> {
        let received = match self.timeout {
            Some(timeout) => self.chunks.recv_timeout(timeout),
            None => self
                .chunks
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Ok(chunk)) => {
                self.pending = chunk;
                self.offset = 0;
                Ok(true)
            }
            Ok(Err(err)) => Err(err),
            Err(RecvTimeoutError::Timeout) => Err(io::Error::from(ErrorKind::WouldBlock)),
            Err(RecvTimeoutError::Disconnected) => Ok(false),
        }
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.offset >= self.pending.len() && !self.next_chunk()? {
            return Ok(0);
        }
        let available = &self.pending[self.offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.offset += n;
        Ok(n)
    }
}

/// Read `inner` on a helper thread and expose it as a source that honours
/// `config.read_timeout`.
///
/// The thread exits at end-of-stream, on the first hard I/O error (which is
/// forwarded), or once the returned source is dropped and its next chunk
/// cannot be delivered.
pub fn spawn_reader<R>(inner: R, config: &LinkConfig) -> io::Result<IoSource<ChannelReader>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("bluefruit-reader".to_string())
        .spawn(move || pump(inner, tx))?;

    debug!(timeout = ?config.read_timeout, "spawned background reader");
    let reader = ChannelReader {
        chunks: rx,
        pending: Vec::new(),
        offset: 0,
        timeout: config.read_timeout,
    };
    Ok(IoSource::with_config(reader, config))
}

fn pump<R: Read>(mut inner: R, tx: mpsc::Sender<io::Result<Vec<u8>>>) {
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match inner.read(&mut chunk) {
            Ok(0) => {
                debug!("background reader reached end of stream");
                return;
            }
            Ok(n) => {
                trace!(bytes = n, "background reader read");
                if tx.send(Ok(chunk[..n].to_vec())).is_err() {
                    return;
                }
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                let _ = tx.send(Err(err));
                return;
            }
        }
    }
}
