use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::append_checksum;
use crate::error::{PacketError, Result};
use crate::header::{PacketFamily, PacketKind, TypeHeader, HEADER_SIZE};
use crate::packets::{
    AccelerometerPacket, ButtonPacket, ColorPacket, GyroPacket, LocationPacket,
    MagnetometerPacket, QuaternionPacket, RawTextPacket,
};
use crate::registry;

/// A fixed-layout, checksummed packet variant.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬────────────────────────┬──────────┐
/// │ '!' (1B) │ Type(1B) │ Payload (fixed, LE)    │ Sum (1B) │
/// └──────────┴──────────┴────────────────────────┴──────────┘
/// ```
pub trait ControllerPacket: Sized {
    const KIND: PacketKind;
    const HEADER: TypeHeader;
    /// Total wire length: header, payload and checksum.
    const FRAME_LENGTH: usize;

    /// Build the packet from a whole frame whose length and checksum were
    /// already validated. Field-level validation happens here.
    fn parse(frame: &[u8]) -> Result<Self>;

    /// Write the payload fields (no header, no checksum).
    fn write_payload(&self, dst: &mut BytesMut);

    fn into_packet(self) -> Packet;

    fn from_packet(packet: Packet) -> Option<Self>;

    /// Append this packet's complete frame to `dst`.
    fn encode(&self, dst: &mut BytesMut) {
        let start = dst.len();
        dst.reserve(Self::FRAME_LENGTH);
        dst.put_slice(Self::HEADER.as_bytes());
        self.write_payload(dst);
        append_checksum(dst, start);
    }

    /// The bytes needed to send this packet.
    fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(Self::FRAME_LENGTH);
        self.encode(&mut dst);
        dst.freeze()
    }

    /// Decode a buffer that must hold exactly this variant.
    ///
    /// Dispatches through the process-wide registry, so the variant must be
    /// registered there.
    fn from_bytes(buf: &[u8]) -> Result<Self> {
        let expected = PacketFamily::Kind(Self::KIND);
        let packet = registry::global().decode_as(buf, expected)?;
        let header = packet.header();
        Self::from_packet(packet).ok_or(PacketError::TypeMismatch { header, expected })
    }
}

/// Payload bytes of a validated frame: everything between header and checksum.
pub(crate) fn payload<P: ControllerPacket>(frame: &[u8]) -> Result<&[u8]> {
    if frame.len() != P::FRAME_LENGTH {
        return Err(PacketError::WrongLength {
            header: P::HEADER,
            expected: P::FRAME_LENGTH,
            actual: frame.len(),
        });
    }
    Ok(&frame[HEADER_SIZE..frame.len() - 1])
}

/// A decoded packet of any registered variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Accelerometer(AccelerometerPacket),
    Gyro(GyroPacket),
    Magnetometer(MagnetometerPacket),
    Quaternion(QuaternionPacket),
    Location(LocationPacket),
    Color(ColorPacket),
    Button(ButtonPacket),
    RawText(RawTextPacket),
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Accelerometer(_) => PacketKind::Accelerometer,
            Packet::Gyro(_) => PacketKind::Gyro,
            Packet::Magnetometer(_) => PacketKind::Magnetometer,
            Packet::Quaternion(_) => PacketKind::Quaternion,
            Packet::Location(_) => PacketKind::Location,
            Packet::Color(_) => PacketKind::Color,
            Packet::Button(_) => PacketKind::Button,
            Packet::RawText(_) => PacketKind::RawText,
        }
    }

    pub fn header(&self) -> TypeHeader {
        self.kind().header()
    }

    /// Append the wire form of this packet to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Packet::Accelerometer(p) => p.encode(dst),
            Packet::Gyro(p) => p.encode(dst),
            Packet::Magnetometer(p) => p.encode(dst),
            Packet::Quaternion(p) => p.encode(dst),
            Packet::Location(p) => p.encode(dst),
            Packet::Color(p) => p.encode(dst),
            Packet::Button(p) => p.encode(dst),
            Packet::RawText(p) => p.encode(dst),
        }
    }

    /// The bytes needed to send this packet.
    pub fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::new();
        self.encode(&mut dst);
        dst.freeze()
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Packet {
                fn from(packet: $ty) -> Self {
                    Packet::$variant(packet)
                }
            }
        )*
    };
}

impl_from_variant! {
    Accelerometer => AccelerometerPacket,
    Gyro => GyroPacket,
    Magnetometer => MagnetometerPacket,
    Quaternion => QuaternionPacket,
    Location => LocationPacket,
    Color => ColorPacket,
    Button => ButtonPacket,
    RawText => RawTextPacket,
}
