//! Byte sources for Bluefruit packet links.
//!
//! A link (BLE UART bridge, serial port, recorded capture) is consumed through
//! the [`ByteSource`] trait: blocking reads that give up after the link's own
//! timeout and report that as an empty result rather than an error.
//!
//! This is the lowest layer of the workspace. The packet codec builds on top
//! of the [`ByteSource`] trait provided here.

pub mod background;
pub mod config;
pub mod error;
pub mod io;
pub mod link;
pub mod traits;

pub use background::{spawn_reader, ChannelReader};
pub use config::{LinkConfig, DEFAULT_MAX_LINE_LENGTH, DEFAULT_READ_TIMEOUT};
pub use error::{Result, TransportError};
pub use io::IoSource;
#[cfg(unix)]
pub use link::connect_unix;
pub use link::open_capture;
pub use traits::ByteSource;
