use bytes::{BufMut, BytesMut};

use crate::error::{PacketError, Result};

/// Checksum of `bytes`: the bitwise complement of their sum, modulo 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}

/// Check that the last byte of `frame` is the checksum of the bytes before it.
pub fn verify_checksum(frame: &[u8]) -> Result<()> {
    let Some((&received, body)) = frame.split_last() else {
        return Err(PacketError::TooShort { len: 0, min: 1 });
    };
    let computed = checksum(body);
    if computed != received {
        return Err(PacketError::BadChecksum { computed, received });
    }
    Ok(())
}

/// Append the checksum of `dst[frame_start..]` to `dst`.
pub fn append_checksum(dst: &mut BytesMut, frame_start: usize) {
    let sum = checksum(&dst[frame_start..]);
    dst.put_u8(sum);
}
