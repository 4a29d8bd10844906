//! Concrete packet variants.

mod button;
mod color;
mod location;
mod raw_text;
mod xyz;

pub use button::ButtonPacket;
pub use color::ColorPacket;
pub use location::LocationPacket;
pub use raw_text::RawTextPacket;
pub use xyz::{
    AccelerometerPacket, GyroPacket, MagnetometerPacket, QuaternionPacket, QUATERNION_FRAME_LENGTH,
    XYZ_FRAME_LENGTH,
};

use bytes::Buf;

/// Read `N` little-endian `f32` values from a payload of exactly `4 * N` bytes.
pub(crate) fn read_f32s<const N: usize>(mut payload: &[u8]) -> [f32; N] {
    let mut values = [0f32; N];
    for value in &mut values {
        *value = payload.get_f32_le();
    }
    values
}
