use crate::header::{PacketFamily, TypeHeader};

/// Errors that can occur while decoding, encoding or registering packets.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// The buffer is too short to hold a header and checksum.
    #[error("packet too short ({len} bytes, need at least {min})")]
    TooShort { len: usize, min: usize },

    /// No variant is registered for the header.
    #[error("unregistered packet type {0}")]
    UnregisteredType(TypeHeader),

    /// The header resolved to a variant outside the requested family.
    #[error("packet type {header} is not a {expected} packet")]
    TypeMismatch {
        header: TypeHeader,
        expected: PacketFamily,
    },

    /// The buffer length does not match the variant's fixed frame length.
    #[error("wrong length for {header} packet ({actual} bytes, expected {expected})")]
    WrongLength {
        header: TypeHeader,
        expected: usize,
        actual: usize,
    },

    /// The trailing checksum byte does not match the frame contents.
    #[error("bad checksum (computed {computed:#04x}, frame carries {received:#04x})")]
    BadChecksum { computed: u8, received: u8 },

    /// A field value was rejected by the variant.
    #[error("invalid {field}: {reason}")]
    InvalidFieldValue { field: &'static str, reason: String },

    /// The variant is line-framed and has no fixed buffer form.
    #[error("packet type {0} is line-framed and cannot be decoded from a fixed buffer")]
    NotFramed(TypeHeader),

    /// The stream timed out before a started frame was complete.
    #[error("incomplete {header} frame ({received} of {expected} bytes before timeout)")]
    IncompleteFrame {
        header: TypeHeader,
        expected: usize,
        received: usize,
    },

    /// A variant was registered twice under the same header.
    #[error("packet type {0} is already registered")]
    DuplicateRegistration(TypeHeader),

    /// The process-wide registry was already installed or already in use.
    #[error("packet registry already installed")]
    RegistryAlreadyInstalled,

    /// The byte source or sink failed.
    #[error("transport error: {0}")]
    Transport(#[from] bluefruit_transport::TransportError),
}

impl PacketError {
    pub(crate) fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors describing a malformed frame rather than a failing link.
    ///
    /// Callers reading a live stream typically log these and keep reading.
    pub fn is_malformed_frame(&self) -> bool {
        !matches!(
            self,
            Self::Transport(_) | Self::DuplicateRegistration(_) | Self::RegistryAlreadyInstalled
        )
    }
}

pub type Result<T> = std::result::Result<T, PacketError>;
