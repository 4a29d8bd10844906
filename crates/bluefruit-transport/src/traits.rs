use bytes::Bytes;

use crate::error::Result;

/// A blocking source of bytes with its own timeout policy.
///
/// Both operations block for at most the source's configured timeout. A
/// timeout is not an error: it is reported as an empty result so callers can
/// poll again later. Errors are reserved for genuine I/O failures.
pub trait ByteSource {
    /// Read up to `n` bytes. Returns fewer (possibly zero) on timeout.
    fn read(&mut self, n: usize) -> Result<Bytes>;

    /// Read bytes up to and including the next newline.
    ///
    /// Returns whatever arrived before the timeout if no newline was seen,
    /// which is empty when nothing arrived at all.
    fn read_line(&mut self) -> Result<Bytes>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, n: usize) -> Result<Bytes> {
        (**self).read(n)
    }

    fn read_line(&mut self) -> Result<Bytes> {
        (**self).read_line()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, n: usize) -> Result<Bytes> {
        (**self).read(n)
    }

    fn read_line(&mut self) -> Result<Bytes> {
        (**self).read_line()
    }
}
