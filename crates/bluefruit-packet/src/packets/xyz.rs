//! Motion sensor packets built on the x, y, z float shape.

use bytes::{BufMut, BytesMut};

use super::read_f32s;
use crate::error::Result;
use crate::header::{PacketKind, TypeHeader, HEADER_SIZE};
use crate::packet::{payload, ControllerPacket, Packet};

/// Frame length of the three-float packets: header, 3 x f32, checksum.
pub const XYZ_FRAME_LENGTH: usize = HEADER_SIZE + 3 * 4 + 1;

/// Frame length of the quaternion packet: header, 4 x f32, checksum.
pub const QUATERNION_FRAME_LENGTH: usize = HEADER_SIZE + 4 * 4 + 1;

macro_rules! xyz_packet {
    ($(#[$meta:meta])* $name:ident => $kind:ident, $header:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            x: f32,
            y: f32,
            z: f32,
        }

        impl $name {
            pub const fn new(x: f32, y: f32, z: f32) -> Self {
                Self { x, y, z }
            }

            pub const fn x(&self) -> f32 {
                self.x
            }

            pub const fn y(&self) -> f32 {
                self.y
            }

            pub const fn z(&self) -> f32 {
                self.z
            }
        }

        impl ControllerPacket for $name {
            const KIND: PacketKind = PacketKind::$kind;
            const HEADER: TypeHeader = TypeHeader::$header;
            const FRAME_LENGTH: usize = XYZ_FRAME_LENGTH;

            fn parse(frame: &[u8]) -> Result<Self> {
                let [x, y, z] = read_f32s(payload::<Self>(frame)?);
                Ok(Self::new(x, y, z))
            }

            fn write_payload(&self, dst: &mut BytesMut) {
                dst.put_f32_le(self.x);
                dst.put_f32_le(self.y);
                dst.put_f32_le(self.z);
            }

            fn into_packet(self) -> Packet {
                Packet::$kind(self)
            }

            fn from_packet(packet: Packet) -> Option<Self> {
                match packet {
                    Packet::$kind(p) => Some(p),
                    _ => None,
                }
            }
        }
    };
}

xyz_packet! {
    /// Accelerometer reading (`!A`).
    AccelerometerPacket => Accelerometer, ACCELEROMETER
}

xyz_packet! {
    /// Gyroscope reading (`!G`).
    GyroPacket => Gyro, GYRO
}

xyz_packet! {
    /// Magnetometer reading (`!M`).
    MagnetometerPacket => Magnetometer, MAGNETOMETER
}

/// Device attitude as a quaternion (`!Q`), derived on the phone from the
/// accelerometer, gyro and magnetometer.
///
/// Same layout as the x, y, z packets with `w` appended.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuaternionPacket {
    x: f32,
    y: f32,
    z: f32,
    w: f32,
}

impl QuaternionPacket {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn x(&self) -> f32 {
        self.x
    }

    pub const fn y(&self) -> f32 {
        self.y
    }

    pub const fn z(&self) -> f32 {
        self.z
    }

    pub const fn w(&self) -> f32 {
        self.w
    }
}

impl ControllerPacket for QuaternionPacket {
    const KIND: PacketKind = PacketKind::Quaternion;
    const HEADER: TypeHeader = TypeHeader::QUATERNION;
    const FRAME_LENGTH: usize = QUATERNION_FRAME_LENGTH;

    fn parse(frame: &[u8]) -> Result<Self> {
        let [x, y, z, w] = read_f32s(payload::<Self>(frame)?);
        Ok(Self::new(x, y, z, w))
    }

    fn write_payload(&self, dst: &mut BytesMut) {
        dst.put_f32_le(self.x);
        dst.put_f32_le(self.y);
        dst.put_f32_le(self.z);
        dst.put_f32_le(self.w);
    }

    fn into_packet(self) -> Packet {
        Packet::Quaternion(self)
    }

    fn from_packet(packet: Packet) -> Option<Self> {
        match packet {
            Packet::Quaternion(p) => Some(p),
            _ => None,
        }
    }
}
