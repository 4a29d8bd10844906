use bytes::{BufMut, BytesMut};

use crate::error::{PacketError, Result};
use crate::header::{PacketKind, TypeHeader, HEADER_SIZE};
use crate::packet::{payload, ControllerPacket, Packet};

/// An RGB color chosen in the app's color picker (`!C`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorPacket {
    red: u8,
    green: u8,
    blue: u8,
}

impl ColorPacket {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_rgb(rgb: u32) -> Result<Self> {
        if rgb > 0x00FF_FFFF {
            return Err(PacketError::invalid_field(
                "color",
                format!("{rgb:#x} does not fit in 0xRRGGBB"),
            ));
        }
        let [_, red, green, blue] = rgb.to_be_bytes();
        Ok(Self::new(red, green, blue))
    }

    pub const fn red(&self) -> u8 {
        self.red
    }

    pub const fn green(&self) -> u8 {
        self.green
    }

    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// The `(red, green, blue)` triple.
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    /// The packed `0xRRGGBB` value.
    pub const fn to_rgb(&self) -> u32 {
        u32::from_be_bytes([0, self.red, self.green, self.blue])
    }
}

impl TryFrom<u32> for ColorPacket {
    type Error = PacketError;

    fn try_from(rgb: u32) -> Result<Self> {
        Self::from_rgb(rgb)
    }
}

impl TryFrom<(i32, i32, i32)> for ColorPacket {
    type Error = PacketError;

    fn try_from((red, green, blue): (i32, i32, i32)) -> Result<Self> {
        Ok(Self::new(
            component("red", red)?,
            component("green", green)?,
            component("blue", blue)?,
        ))
    }
}

impl From<[u8; 3]> for ColorPacket {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

fn component(field: &'static str, value: i32) -> Result<u8> {
    u8::try_from(value)
        .map_err(|_| PacketError::invalid_field(field, format!("{value} is outside 0..=255")))
}

impl ControllerPacket for ColorPacket {
    const KIND: PacketKind = PacketKind::Color;
    const HEADER: TypeHeader = TypeHeader::COLOR;
    const FRAME_LENGTH: usize = HEADER_SIZE + 3 + 1;

    fn parse(frame: &[u8]) -> Result<Self> {
        match payload::<Self>(frame)? {
            &[red, green, blue] => Ok(Self::new(red, green, blue)),
            other => Err(PacketError::invalid_field(
                "color",
                format!("expected 3 component bytes, got {}", other.len()),
            )),
        }
    }

    fn write_payload(&self, dst: &mut BytesMut) {
        dst.put_u8(self.red);
        dst.put_u8(self.green);
        dst.put_u8(self.blue);
    }

    fn into_packet(self) -> Packet {
        Packet::Color(self)
    }

    fn from_packet(packet: Packet) -> Option<Self> {
        match packet {
            Packet::Color(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_and_tuple_constructors_agree() {
        let packed = ColorPacket::try_from(0x112233u32).unwrap();
        let tuple = ColorPacket::try_from((0x11i32, 0x22i32, 0x33i32)).unwrap();
        assert_eq!(packed, tuple);
        assert_eq!(packed.rgb(), (0x11, 0x22, 0x33));
        assert_eq!(packed.to_rgb(), 0x112233);
    }

    #[test]
    fn out_of_range_component_fails() {
        let err = ColorPacket::try_from((256i32, 0i32, 0i32)).unwrap_err();
        assert!(matches!(
            err,
            PacketError::InvalidFieldValue { field: "red", .. }
        ));

        let err = ColorPacket::try_from((0i32, -1i32, 0i32)).unwrap_err();
        assert!(matches!(
            err,
            PacketError::InvalidFieldValue { field: "green", .. }
        ));
    }

    #[test]
    fn oversized_packed_value_fails() {
        assert!(ColorPacket::from_rgb(0x0100_0000).is_err());
        assert_eq!(
            ColorPacket::from_rgb(0x00FF_FFFF).unwrap(),
            ColorPacket::new(255, 255, 255)
        );
    }

    #[test]
    fn color_wire_layout() {
        let bytes = ColorPacket::new(0x11, 0x22, 0x33).to_bytes();
        assert_eq!(bytes.as_ref(), b"!C\x11\x22\x33\x35");
    }

    #[test]
    fn color_parse() {
        let parsed = ColorPacket::parse(b"!C\xff\x00\x80\x00").unwrap();
        assert_eq!(parsed, ColorPacket::from([0xff, 0x00, 0x80]));
    }
}
