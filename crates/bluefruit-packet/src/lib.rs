//! Packet codec for the Bluefruit Connect controller protocol.
//!
//! Every controller packet is framed as:
//! - A 2-byte type header: the `!` start marker and a selector byte
//! - A fixed-layout little-endian payload
//! - A 1-byte checksum, the bitwise NOT of the byte sum of everything before it
//!
//! Lines of plain text sent without a header decode as [`RawTextPacket`].
//! Decoding dispatches through a [`PacketRegistry`] keyed by type header.

pub mod checksum;
pub mod error;
pub mod header;
pub mod packet;
pub mod packets;
pub mod reader;
pub mod registry;
pub mod writer;

pub use checksum::{append_checksum, checksum, verify_checksum};
pub use error::{PacketError, Result};
pub use header::{PacketFamily, PacketKind, TypeHeader, HEADER_SIZE, MIN_FRAME_SIZE, START_MARKER};
pub use packet::{ControllerPacket, Packet};
pub use packets::{
    AccelerometerPacket, ButtonPacket, ColorPacket, GyroPacket, LocationPacket,
    MagnetometerPacket, QuaternionPacket, RawTextPacket, QUATERNION_FRAME_LENGTH,
    XYZ_FRAME_LENGTH,
};
pub use reader::PacketReader;
pub use registry::{
    decode_from_buffer, decode_from_buffer_as, global, install, Framing, PacketDescriptor,
    PacketRegistry, RegistryBuilder,
};
pub use writer::PacketWriter;
