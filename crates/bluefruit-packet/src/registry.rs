//! Header-keyed table of packet decoders.
//!
//! A [`RegistryBuilder`] collects registrations at startup and freezes into an
//! immutable [`PacketRegistry`]. One registry can be installed process-wide
//! with [`install`]; [`global`] falls back to [`PacketRegistry::standard`] when
//! nothing was installed. Installation must happen before the first decode.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::checksum::verify_checksum;
use crate::error::{PacketError, Result};
use crate::header::{PacketFamily, PacketKind, TypeHeader, MIN_FRAME_SIZE};
use crate::packet::{ControllerPacket, Packet};
use crate::packets::{
    AccelerometerPacket, ButtonPacket, ColorPacket, GyroPacket, LocationPacket,
    MagnetometerPacket, QuaternionPacket, RawTextPacket,
};

/// Builds a packet from a whole, validated frame.
pub type DecodeFn = fn(&[u8]) -> Result<Packet>;

/// Builds a packet from a line of bytes (no validation applies).
pub type LineFn = fn(Bytes) -> Packet;

/// How a registered variant is delimited on the wire.
#[derive(Clone, Copy)]
pub enum Framing {
    /// `!`-framed with a fixed total length and trailing checksum.
    Fixed { length: usize, decode: DecodeFn },
    /// Newline-terminated, no header and no checksum.
    Line { construct: LineFn },
}

/// Registry entry: what a header decodes to and how.
#[derive(Clone, Copy)]
pub struct PacketDescriptor {
    pub kind: PacketKind,
    pub framing: Framing,
}

impl PacketDescriptor {
    /// Descriptor for a fixed-layout variant.
    pub fn of<P: ControllerPacket>() -> Self {
        Self {
            kind: P::KIND,
            framing: Framing::Fixed {
                length: P::FRAME_LENGTH,
                decode: decode_packet::<P>,
            },
        }
    }

    /// Descriptor for the raw text fallback.
    pub fn raw_text() -> Self {
        Self {
            kind: PacketKind::RawText,
            framing: Framing::Line {
                construct: |line| Packet::RawText(RawTextPacket::new(line)),
            },
        }
    }

    /// Total frame length, or `None` for line-framed variants.
    pub fn fixed_length(&self) -> Option<usize> {
        match self.framing {
            Framing::Fixed { length, .. } => Some(length),
            Framing::Line { .. } => None,
        }
    }
}

impl fmt::Debug for PacketDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketDescriptor")
            .field("kind", &self.kind)
            .field("fixed_length", &self.fixed_length())
            .finish()
    }
}

fn decode_packet<P: ControllerPacket>(frame: &[u8]) -> Result<Packet> {
    P::parse(frame).map(P::into_packet)
}

fn controller_descriptors() -> [PacketDescriptor; 7] {
    [
        PacketDescriptor::of::<AccelerometerPacket>(),
        PacketDescriptor::of::<GyroPacket>(),
        PacketDescriptor::of::<MagnetometerPacket>(),
        PacketDescriptor::of::<QuaternionPacket>(),
        PacketDescriptor::of::<LocationPacket>(),
        PacketDescriptor::of::<ColorPacket>(),
        PacketDescriptor::of::<ButtonPacket>(),
    ]
}

/// Collects registrations before a registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: HashMap<TypeHeader, PacketDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under `header`. Each header may be registered once.
    pub fn register(&mut self, header: TypeHeader, descriptor: PacketDescriptor) -> Result<()> {
        if self.descriptors.contains_key(&header) {
            return Err(PacketError::DuplicateRegistration(header));
        }
        debug!(%header, kind = %descriptor.kind, "registered packet type");
        self.descriptors.insert(header, descriptor);
        Ok(())
    }

    /// Register a fixed-layout variant under its own header.
    pub fn register_packet<P: ControllerPacket>(&mut self) -> Result<()> {
        self.register(P::HEADER, PacketDescriptor::of::<P>())
    }

    /// Register all seven `!`-framed controller packets.
    pub fn register_controller_packets(&mut self) -> Result<()> {
        for descriptor in controller_descriptors() {
            self.register(descriptor.kind.header(), descriptor)?;
        }
        Ok(())
    }

    /// Register the raw text fallback used for lines not starting with `!`.
    pub fn register_raw_text(&mut self) -> Result<()> {
        self.register(TypeHeader::RAW_TEXT, PacketDescriptor::raw_text())
    }

    pub fn build(self) -> PacketRegistry {
        PacketRegistry {
            descriptors: self.descriptors,
        }
    }
}

/// Immutable header-to-descriptor table.
#[derive(Debug, Clone)]
pub struct PacketRegistry {
    descriptors: HashMap<TypeHeader, PacketDescriptor>,
}

impl PacketRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Every controller packet plus the raw text fallback.
    pub fn standard() -> Self {
        let mut descriptors: HashMap<TypeHeader, PacketDescriptor> = controller_descriptors()
            .into_iter()
            .map(|descriptor| (descriptor.kind.header(), descriptor))
            .collect();
        descriptors.insert(TypeHeader::RAW_TEXT, PacketDescriptor::raw_text());
        Self { descriptors }
    }

    /// Every controller packet, without the raw text fallback. Stream readers
    /// using this registry skip non-packet bytes instead of returning text.
    pub fn controller_only() -> Self {
        let descriptors = controller_descriptors()
            .into_iter()
            .map(|descriptor| (descriptor.kind.header(), descriptor))
            .collect();
        Self { descriptors }
    }

    pub fn lookup(&self, header: TypeHeader) -> Option<&PacketDescriptor> {
        self.descriptors.get(&header)
    }

    pub fn contains(&self, header: TypeHeader) -> bool {
        self.descriptors.contains_key(&header)
    }

    /// Registered headers in sorted order.
    pub fn headers(&self) -> Vec<TypeHeader> {
        let mut headers: Vec<TypeHeader> = self.descriptors.keys().copied().collect();
        headers.sort_unstable();
        headers
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Decode one complete frame of any registered kind.
    pub fn decode(&self, buf: &[u8]) -> Result<Packet> {
        self.decode_as(buf, PacketFamily::Any)
    }

    /// Decode one complete frame, requiring its kind to be in `family`.
    ///
    /// Checks run in order: minimum size, registered header, family, exact
    /// length, checksum. Only then is the variant's own decoder invoked,
    /// which may reject individual field values.
    pub fn decode_as(&self, buf: &[u8], family: PacketFamily) -> Result<Packet> {
        if buf.len() < MIN_FRAME_SIZE {
            return Err(PacketError::TooShort {
                len: buf.len(),
                min: MIN_FRAME_SIZE,
            });
        }

        let header = TypeHeader::from_bytes([buf[0], buf[1]]);
        let descriptor = self
            .lookup(header)
            .ok_or(PacketError::UnregisteredType(header))?;

        if !family.contains(descriptor.kind) {
            return Err(PacketError::TypeMismatch {
                header,
                expected: family,
            });
        }

        let (length, decode) = match descriptor.framing {
            Framing::Fixed { length, decode } => (length, decode),
            Framing::Line { .. } => return Err(PacketError::NotFramed(header)),
        };

        if buf.len() != length {
            return Err(PacketError::WrongLength {
                header,
                expected: length,
                actual: buf.len(),
            });
        }

        verify_checksum(buf)?;

        trace!(%header, frame = ?buf, "decoding frame");
        decode(buf)
    }
}

impl Default for PacketRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

static GLOBAL: OnceLock<PacketRegistry> = OnceLock::new();

/// Install `registry` as the process-wide registry.
///
/// Fails if a registry was already installed, or if [`global`] was already
/// called and installed the standard one.
pub fn install(registry: PacketRegistry) -> Result<&'static PacketRegistry> {
    GLOBAL
        .set(registry)
        .map_err(|_| PacketError::RegistryAlreadyInstalled)?;
    Ok(global())
}

/// The process-wide registry, installing [`PacketRegistry::standard`] on first
/// use if nothing was installed.
pub fn global() -> &'static PacketRegistry {
    GLOBAL.get_or_init(PacketRegistry::standard)
}

/// Decode one frame through the process-wide registry.
pub fn decode_from_buffer(buf: &[u8]) -> Result<Packet> {
    global().decode(buf)
}

/// Decode one frame through the process-wide registry, narrowed to `family`.
pub fn decode_from_buffer_as(buf: &[u8], family: PacketFamily) -> Result<Packet> {
    global().decode_as(buf, family)
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::*;
    use crate::checksum::append_checksum;

    fn frame(body: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::from(body);
        append_checksum(&mut buf, 0);
        buf.to_vec()
    }

    #[test]
    fn standard_registry_contents() {
        let registry = PacketRegistry::standard();
        assert_eq!(registry.len(), 8);
        for kind in PacketKind::ALL {
            let descriptor = registry.lookup(kind.header()).unwrap();
            assert_eq!(descriptor.kind, kind);
        }
        assert_eq!(
            registry.lookup(TypeHeader::COLOR).unwrap().fixed_length(),
            Some(6)
        );
        assert_eq!(
            registry.lookup(TypeHeader::RAW_TEXT).unwrap().fixed_length(),
            None
        );
    }

    #[test]
    fn controller_only_has_no_raw_text() {
        let registry = PacketRegistry::controller_only();
        assert_eq!(registry.len(), 7);
        assert!(!registry.contains(TypeHeader::RAW_TEXT));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut builder = PacketRegistry::builder();
        builder.register_packet::<ColorPacket>().unwrap();
        let err = builder.register_packet::<ColorPacket>().unwrap_err();
        assert!(matches!(
            err,
            PacketError::DuplicateRegistration(TypeHeader::COLOR)
        ));

        let mut builder = PacketRegistry::builder();
        builder.register_controller_packets().unwrap();
        assert!(builder.register_controller_packets().is_err());
    }

    #[test]
    fn headers_are_sorted() {
        let mut builder = RegistryBuilder::new();
        builder.register_packet::<QuaternionPacket>().unwrap();
        builder.register_packet::<AccelerometerPacket>().unwrap();
        builder.register_raw_text().unwrap();
        let registry = builder.build();

        assert_eq!(
            registry.headers(),
            vec![
                TypeHeader::ACCELEROMETER,
                TypeHeader::QUATERNION,
                TypeHeader::RAW_TEXT
            ]
        );
    }

    #[test]
    fn decode_color_frame() {
        let registry = PacketRegistry::standard();
        let packet = registry.decode(&frame(b"!C\x01\x02\x03")).unwrap();
        assert_eq!(packet, Packet::Color(ColorPacket::new(1, 2, 3)));
    }

    #[test]
    fn decode_too_short() {
        let registry = PacketRegistry::standard();
        let err = registry.decode(b"!C").unwrap_err();
        assert!(matches!(err, PacketError::TooShort { len: 2, min: 3 }));
    }

    #[test]
    fn decode_unregistered_type() {
        let registry = PacketRegistry::standard();
        let err = registry.decode(&frame(b"!Z\x00")).unwrap_err();
        assert!(matches!(err, PacketError::UnregisteredType(h) if h == TypeHeader::framed(b'Z')));
    }

    #[test]
    fn decode_unregistered_in_custom_registry() {
        let mut builder = RegistryBuilder::new();
        builder.register_packet::<ButtonPacket>().unwrap();
        let registry = builder.build();

        let err = registry
            .decode(&ColorPacket::new(1, 1, 1).to_bytes())
            .unwrap_err();
        assert!(matches!(err, PacketError::UnregisteredType(TypeHeader::COLOR)));
    }

    #[test]
    fn decode_wrong_length() {
        let registry = PacketRegistry::standard();
        let good = ColorPacket::new(1, 2, 3).to_bytes();

        let short = frame(&good[..4]);
        let err = registry.decode(&short).unwrap_err();
        assert!(matches!(
            err,
            PacketError::WrongLength {
                expected: 6,
                actual: 5,
                ..
            }
        ));

        let long = frame(&[&good[..5], &[0u8][..]].concat());
        let err = registry.decode(&long).unwrap_err();
        assert!(matches!(
            err,
            PacketError::WrongLength {
                expected: 6,
                actual: 7,
                ..
            }
        ));
    }

    #[test]
    fn decode_bad_checksum() {
        let registry = PacketRegistry::standard();
        let mut bytes = ButtonPacket::new("4", true).unwrap().to_bytes().to_vec();
        let last = bytes.len() - 1;
        bytes[last] = bytes[last].wrapping_add(1);

        let err = registry.decode(&bytes).unwrap_err();
        assert!(matches!(err, PacketError::BadChecksum { .. }));
    }

    #[test]
    fn length_is_checked_before_checksum() {
        let registry = PacketRegistry::standard();
        let err = registry.decode(b"!C\x00\x00").unwrap_err();
        assert!(matches!(err, PacketError::WrongLength { .. }));
    }

    #[test]
    fn decode_invalid_button_state() {
        let registry = PacketRegistry::standard();
        let err = registry.decode(&frame(b"!B1x")).unwrap_err();
        assert!(matches!(err, PacketError::InvalidFieldValue { .. }));
    }

    #[test]
    fn decode_as_xyz_family() {
        let registry = PacketRegistry::standard();

        let quat = QuaternionPacket::new(1.0, 0.0, 0.0, 0.0).to_bytes();
        let packet = registry.decode_as(&quat, PacketFamily::Xyz).unwrap();
        assert_eq!(packet.kind(), PacketKind::Quaternion);

        let location = LocationPacket::new(1.0, 2.0, 3.0).to_bytes();
        let err = registry
            .decode_as(&location, PacketFamily::Xyz)
            .unwrap_err();
        assert!(matches!(
            err,
            PacketError::TypeMismatch {
                header: TypeHeader::LOCATION,
                expected: PacketFamily::Xyz,
            }
        ));
    }

    #[test]
    fn family_is_checked_before_length() {
        let registry = PacketRegistry::standard();
        let err = registry
            .decode_as(b"!C\x00", PacketFamily::Kind(PacketKind::Button))
            .unwrap_err();
        assert!(matches!(err, PacketError::TypeMismatch { .. }));
    }

    #[test]
    fn raw_text_is_not_buffer_decodable() {
        let registry = PacketRegistry::standard();
        let err = registry.decode(b"RThello").unwrap_err();
        assert!(matches!(err, PacketError::NotFramed(TypeHeader::RAW_TEXT)));
    }

    #[test]
    fn custom_header_mapping() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(TypeHeader::framed(b'c'), PacketDescriptor::of::<ColorPacket>())
            .unwrap();
        let registry = builder.build();

        let packet = registry.decode(&frame(b"!c\x0a\x0b\x0c")).unwrap();
        assert_eq!(packet, Packet::Color(ColorPacket::new(10, 11, 12)));
    }

    #[test]
    fn global_registry_decodes_standard_packets() {
        let bytes = GyroPacket::new(0.0, -1.0, 2.0).to_bytes();
        let packet = decode_from_buffer(&bytes).unwrap();
        assert_eq!(packet, Packet::Gyro(GyroPacket::new(0.0, -1.0, 2.0)));

        let err = decode_from_buffer_as(&bytes, PacketKind::Color.into()).unwrap_err();
        assert!(matches!(err, PacketError::TypeMismatch { .. }));
    }

    #[test]
    fn install_after_use_fails() {
        let _ = global();
        let err = install(PacketRegistry::controller_only()).unwrap_err();
        assert!(matches!(err, PacketError::RegistryAlreadyInstalled));
    }
}
