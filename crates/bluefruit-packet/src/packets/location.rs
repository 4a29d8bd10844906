use bytes::{BufMut, BytesMut};

use super::read_f32s;
use super::xyz::XYZ_FRAME_LENGTH;
use crate::error::Result;
use crate::header::{PacketKind, TypeHeader};
use crate::packet::{payload, ControllerPacket, Packet};

/// Geographic position reported by the phone (`!L`).
///
/// Shares the three-float layout of the motion packets but is not one of
/// them: decoding narrowed to the x, y, z family rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocationPacket {
    latitude: f32,
    longitude: f32,
    altitude: f32,
}

impl LocationPacket {
    pub const fn new(latitude: f32, longitude: f32, altitude: f32) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    pub const fn latitude(&self) -> f32 {
        self.latitude
    }

    pub const fn longitude(&self) -> f32 {
        self.longitude
    }

    pub const fn altitude(&self) -> f32 {
        self.altitude
    }
}

impl ControllerPacket for LocationPacket {
    const KIND: PacketKind = PacketKind::Location;
    const HEADER: TypeHeader = TypeHeader::LOCATION;
    const FRAME_LENGTH: usize = XYZ_FRAME_LENGTH;

    fn parse(frame: &[u8]) -> Result<Self> {
        let [latitude, longitude, altitude] = read_f32s(payload::<Self>(frame)?);
        Ok(Self::new(latitude, longitude, altitude))
    }

    fn write_payload(&self, dst: &mut BytesMut) {
        dst.put_f32_le(self.latitude);
        dst.put_f32_le(self.longitude);
        dst.put_f32_le(self.altitude);
    }

    fn into_packet(self) -> Packet {
        Packet::Location(self)
    }

    fn from_packet(packet: Packet) -> Option<Self> {
        match packet {
            Packet::Location(p) => Some(p),
            _ => None,
        }
    }
}
