use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bluefruit_packet::{registry, PacketReader, PacketRegistry};
use bluefruit_transport::{open_capture, spawn_reader, IoSource, LinkConfig};
use tracing::{debug, warn};

use crate::cmd::{parse_duration, ListenArgs};
use crate::exit::{packet_error, transport_error, CliError, CliResult, SUCCESS};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let config = LinkConfig {
        read_timeout: Some(parse_duration(&args.timeout)?),
        ..LinkConfig::default()
    };

    let controller_only;
    let registry: &PacketRegistry = if args.no_raw_text {
        controller_only = PacketRegistry::controller_only();
        &controller_only
    } else {
        registry::global()
    };

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let session = Session {
        registry,
        count: args.count,
        format,
        running: &running,
    };

    if let Some(path) = &args.socket {
        return session.run(connect_socket(path, &config)?);
    }
    if let Some(path) = &args.file {
        let source =
            open_capture(path, &config).map_err(|err| transport_error("open failed", err))?;
        return session.run(source);
    }
    // Blocking stdin reads ignore both the timeout and Ctrl-C.
    let source = spawn_reader(std::io::stdin(), &config).map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("stdin reader setup failed: {err}"),
        )
    })?;
    session.run(source)
}

#[cfg(unix)]
fn connect_socket(
    path: &std::path::Path,
    config: &LinkConfig,
) -> CliResult<IoSource<std::os::unix::net::UnixStream>> {
    bluefruit_transport::connect_unix(path, config)
        .map_err(|err| transport_error("connect failed", err))
}

#[cfg(not(unix))]
fn connect_socket(_path: &std::path::Path, _config: &LinkConfig) -> CliResult<IoSource<std::fs::File>> {
    Err(CliError::usage(
        "unix socket links are not supported on this platform",
    ))
}

struct Session<'a> {
    registry: &'a PacketRegistry,
    count: Option<usize>,
    format: OutputFormat,
    running: &'a AtomicBool,
}

impl Session<'_> {
    fn run<R: Read>(&self, source: IoSource<R>) -> CliResult<i32> {
        let mut reader = PacketReader::with_registry(source, self.registry);
        let mut printed = 0usize;

        while self.running.load(Ordering::SeqCst) {
            match reader.read_packet() {
                Ok(Some(packet)) => {
                    print_packet(&packet, self.format);
                    printed = printed.saturating_add(1);
                    if self.count.is_some_and(|count| printed >= count) {
                        break;
                    }
                }
                Ok(None) => {
                    if reader.get_ref().is_closed() {
                        debug!(printed, "link closed");
                        break;
                    }
                }
                Err(err) if err.is_malformed_frame() => {
                    warn!(error = %err, "dropped malformed frame");
                }
                Err(err) => return Err(packet_error("receive failed", err)),
            }
        }

        Ok(SUCCESS)
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bluefruit_packet::{ColorPacket, ControllerPacket};

    use super::*;

    fn session<'a>(registry: &'a PacketRegistry, running: &'a AtomicBool) -> Session<'a> {
        Session {
            registry,
            count: None,
            format: OutputFormat::Pretty,
            running,
        }
    }

    #[test]
    fn malformed_frames_do_not_stop_listening() {
        let registry = PacketRegistry::standard();
        let running = AtomicBool::new(true);

        let mut wire = ColorPacket::new(1, 2, 3).to_bytes().to_vec();
        wire[5] ^= 0xff;
        wire.extend_from_slice(&ColorPacket::new(4, 5, 6).to_bytes());

        let source = IoSource::new(Cursor::new(wire));
        assert_eq!(session(&registry, &running).run(source).unwrap(), SUCCESS);
    }

    #[test]
    fn stops_when_flag_cleared() {
        let registry = PacketRegistry::standard();
        let running = AtomicBool::new(false);
        let source = IoSource::new(Cursor::new(b"never read\n".to_vec()));
        assert_eq!(session(&registry, &running).run(source).unwrap(), SUCCESS);
    }
}
