use std::fmt;
use std::io;

use bluefruit_packet::PacketError;
use bluefruit_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => FAILURE,
        io::ErrorKind::BrokenPipe | io::ErrorKind::WriteZero => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { source, .. }
        | TransportError::Open { source, .. }
        | TransportError::Io(source) => io_error(context, source),
    }
}

pub fn packet_error(context: &str, err: PacketError) -> CliError {
    match err {
        PacketError::Transport(err) => transport_error(context, err),
        PacketError::DuplicateRegistration(_) | PacketError::RegistryAlreadyInstalled => {
            CliError::new(INTERNAL, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use bluefruit_packet::TypeHeader;

    use super::*;

    #[test]
    fn malformed_frames_are_data_invalid() {
        let err = packet_error(
            "decode failed",
            PacketError::BadChecksum {
                computed: 0x35,
                received: 0x00,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode failed: "));

        let err = packet_error(
            "decode failed",
            PacketError::UnregisteredType(TypeHeader::framed(b'Z')),
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn transport_errors_map_by_io_kind() {
        let err = packet_error(
            "read failed",
            PacketError::Transport(TransportError::Io(io::ErrorKind::PermissionDenied.into())),
        );
        assert_eq!(err.code, PERMISSION_DENIED);

        let err = transport_error(
            "connect failed",
            TransportError::Connect {
                path: "/tmp/missing.sock".into(),
                source: io::ErrorKind::NotFound.into(),
            },
        );
        assert_eq!(err.code, FAILURE);
    }
}
