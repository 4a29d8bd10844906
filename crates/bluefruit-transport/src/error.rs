use std::path::PathBuf;

/// Errors that can occur while opening or reading a byte source.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to a socket link.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to open a capture file or device.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
