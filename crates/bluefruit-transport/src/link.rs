//! Opening concrete links.
//!
//! Sockets carry the read timeout on the stream itself, so it is applied here
//! before the stream is wrapped. Capture files never time out; they end.

use std::fs::File;
use std::path::Path;

use tracing::{debug, info};

use crate::config::LinkConfig;
use crate::error::{Result, TransportError};
use crate::io::IoSource;

/// Connect to a Unix domain socket link (e.g. a BLE UART bridge daemon).
///
/// The configured read timeout is applied to the stream, so reads that see no
/// traffic for that long come back empty.
#[cfg(unix)]
pub fn connect_unix(
    path: impl AsRef<Path>,
    config: &LinkConfig,
) -> Result<IoSource<std::os::unix::net::UnixStream>> {
    let path = path.as_ref();
    let stream =
        std::os::unix::net::UnixStream::connect(path).map_err(|e| TransportError::Connect {
            path: path.to_path_buf(),
            source: e,
        })?;
    stream.set_read_timeout(config.read_timeout)?;

    info!(?path, timeout = ?config.read_timeout, "connected to unix socket link");
    Ok(IoSource::with_config(stream, config))
}

/// Open a recorded byte capture for replay.
pub fn open_capture(path: impl AsRef<Path>, config: &LinkConfig) -> Result<IoSource<File>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TransportError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(?path, "opened capture file");
    Ok(IoSource::with_config(file, config))
}
