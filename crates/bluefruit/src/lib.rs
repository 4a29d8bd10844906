//! Bluefruit Connect controller packets.
//!
//! The Bluefruit Connect app sends sensor readings, color picks, button
//! presses and lines of text over a BLE UART link. This crate decodes and
//! encodes those packets.
//!
//! # Crate Structure
//!
//! - [`transport`]: byte sources over sockets, files and any `Read` stream
//! - [`packet`]: checksum, packet variants, registry, stream reader and writer

/// Re-export transport types.
pub mod transport {
    pub use bluefruit_transport::*;
}

/// Re-export packet types.
pub mod packet {
    pub use bluefruit_packet::*;
}
