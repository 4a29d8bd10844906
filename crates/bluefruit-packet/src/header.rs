//! Type headers, packet kinds and kind families.
//!
//! Every `!`-framed packet starts with a 2-byte header: the start marker `!`
//! followed by a selector byte naming the variant. Raw text has no header on
//! the wire and is tracked under the pseudo-header `RT`.

use std::fmt;

/// First byte of every framed packet.
pub const START_MARKER: u8 = b'!';

/// Bytes occupied by a type header.
pub const HEADER_SIZE: usize = 2;

/// Smallest possible frame: header plus checksum.
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + 1;

/// The 2-byte value identifying a packet variant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHeader([u8; 2]);

impl TypeHeader {
    pub const ACCELEROMETER: Self = Self::framed(b'A');
    pub const BUTTON: Self = Self::framed(b'B');
    pub const COLOR: Self = Self::framed(b'C');
    pub const GYRO: Self = Self::framed(b'G');
    pub const LOCATION: Self = Self::framed(b'L');
    pub const MAGNETOMETER: Self = Self::framed(b'M');
    pub const QUATERNION: Self = Self::framed(b'Q');
    /// Pseudo-header for the raw text fallback. Never appears on the wire.
    pub const RAW_TEXT: Self = Self(*b"RT");

    /// Header for a `!`-framed packet with the given selector byte.
    pub const fn framed(selector: u8) -> Self {
        Self([START_MARKER, selector])
    }

    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    /// Header formed by the first two bytes of `buf`, if present.
    pub fn from_slice(buf: &[u8]) -> Option<Self> {
        match buf {
            [first, second, ..] => Some(Self([*first, *second])),
            _ => None,
        }
    }

    pub const fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    /// The variant selector byte.
    pub const fn selector(&self) -> u8 {
        self.0[1]
    }

    /// True when the header starts with the `!` start marker.
    pub const fn is_framed(&self) -> bool {
        self.0[0] == START_MARKER
    }
}

impl fmt::Display for TypeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(u8::is_ascii_graphic) {
            write!(f, "\"{}{}\"", self.0[0] as char, self.0[1] as char)
        } else {
            write!(f, "0x{:02x}{:02x}", self.0[0], self.0[1])
        }
    }
}

impl fmt::Debug for TypeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHeader({self})")
    }
}

/// The closed set of packet variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PacketKind {
    Accelerometer,
    Gyro,
    Magnetometer,
    Quaternion,
    Location,
    Color,
    Button,
    RawText,
}

impl PacketKind {
    pub const ALL: [PacketKind; 8] = [
        PacketKind::Accelerometer,
        PacketKind::Gyro,
        PacketKind::Magnetometer,
        PacketKind::Quaternion,
        PacketKind::Location,
        PacketKind::Color,
        PacketKind::Button,
        PacketKind::RawText,
    ];

    pub const fn header(self) -> TypeHeader {
        match self {
            PacketKind::Accelerometer => TypeHeader::ACCELEROMETER,
            PacketKind::Gyro => TypeHeader::GYRO,
            PacketKind::Magnetometer => TypeHeader::MAGNETOMETER,
            PacketKind::Quaternion => TypeHeader::QUATERNION,
            PacketKind::Location => TypeHeader::LOCATION,
            PacketKind::Color => TypeHeader::COLOR,
            PacketKind::Button => TypeHeader::BUTTON,
            PacketKind::RawText => TypeHeader::RAW_TEXT,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PacketKind::Accelerometer => "accelerometer",
            PacketKind::Gyro => "gyro",
            PacketKind::Magnetometer => "magnetometer",
            PacketKind::Quaternion => "quaternion",
            PacketKind::Location => "location",
            PacketKind::Color => "color",
            PacketKind::Button => "button",
            PacketKind::RawText => "raw_text",
        }
    }

    /// Kind whose standard header is `header`.
    pub fn from_header(header: TypeHeader) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.header() == header)
    }

    /// Kind with the given [`name`](Self::name), ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// True for kinds built on the three-float x, y, z shape.
    pub const fn is_xyz(self) -> bool {
        matches!(
            self,
            PacketKind::Accelerometer
                | PacketKind::Gyro
                | PacketKind::Magnetometer
                | PacketKind::Quaternion
        )
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Restricts a decode call to a subset of kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PacketFamily {
    /// Every registered kind.
    #[default]
    Any,
    /// Kinds sharing the x, y, z float shape, quaternion included.
    Xyz,
    /// Exactly one kind.
    Kind(PacketKind),
}

impl PacketFamily {
    pub fn contains(self, kind: PacketKind) -> bool {
        match self {
            PacketFamily::Any => true,
            PacketFamily::Xyz => kind.is_xyz(),
            PacketFamily::Kind(expected) => expected == kind,
        }
    }

    /// Family named `any`, `xyz`, or a kind name.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("any") {
            return Some(PacketFamily::Any);
        }
        if name.eq_ignore_ascii_case("xyz") {
            return Some(PacketFamily::Xyz);
        }
        PacketKind::from_name(name).map(PacketFamily::Kind)
    }
}

impl fmt::Display for PacketFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketFamily::Any => f.write_str("any"),
            PacketFamily::Xyz => f.write_str("xyz"),
            PacketFamily::Kind(kind) => f.write_str(kind.name()),
        }
    }
}

impl From<PacketKind> for PacketFamily {
    fn from(kind: PacketKind) -> Self {
        PacketFamily::Kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framed_headers_start_with_marker() {
        for kind in PacketKind::ALL {
            let header = kind.header();
            assert_eq!(header.is_framed(), kind != PacketKind::RawText, "{kind}");
        }
        assert_eq!(TypeHeader::COLOR.as_bytes(), b"!C");
        assert_eq!(TypeHeader::COLOR.selector(), b'C');
    }

    #[test]
    fn headers_are_unique() {
        let mut headers: Vec<TypeHeader> = PacketKind::ALL.iter().map(|k| k.header()).collect();
        headers.sort();
        headers.dedup();
        assert_eq!(headers.len(), PacketKind::ALL.len());
    }

    #[test]
    fn header_from_slice() {
        assert_eq!(TypeHeader::from_slice(b"!Bxx"), Some(TypeHeader::BUTTON));
        assert_eq!(TypeHeader::from_slice(b"!"), None);
    }

    #[test]
    fn header_display() {
        assert_eq!(TypeHeader::QUATERNION.to_string(), "\"!Q\"");
        assert_eq!(TypeHeader::from_bytes([0x21, 0x00]).to_string(), "0x2100");
    }

    #[test]
    fn kind_lookup_by_header_and_name() {
        assert_eq!(
            PacketKind::from_header(TypeHeader::GYRO),
            Some(PacketKind::Gyro)
        );
        assert_eq!(PacketKind::from_header(TypeHeader::framed(b'Z')), None);
        assert_eq!(PacketKind::from_name("Color"), Some(PacketKind::Color));
        assert_eq!(PacketKind::from_name("raw_text"), Some(PacketKind::RawText));
        assert_eq!(PacketKind::from_name("nope"), None);
    }

    #[test]
    fn xyz_family_membership() {
        let xyz = PacketFamily::Xyz;
        assert!(xyz.contains(PacketKind::Accelerometer));
        assert!(xyz.contains(PacketKind::Quaternion));
        assert!(!xyz.contains(PacketKind::Location));
        assert!(!xyz.contains(PacketKind::Color));
    }

    #[test]
    fn kind_family_is_exact() {
        let family = PacketFamily::from(PacketKind::Gyro);
        assert!(family.contains(PacketKind::Gyro));
        assert!(!family.contains(PacketKind::Accelerometer));
        assert!(PacketFamily::Any.contains(PacketKind::RawText));
    }

    #[test]
    fn family_from_name() {
        assert_eq!(PacketFamily::from_name("XYZ"), Some(PacketFamily::Xyz));
        assert_eq!(PacketFamily::from_name("any"), Some(PacketFamily::Any));
        assert_eq!(
            PacketFamily::from_name("button"),
            Some(PacketFamily::Kind(PacketKind::Button))
        );
        assert_eq!(PacketFamily::from_name("bogus"), None);
    }
}
