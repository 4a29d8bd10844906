use crate::cmd::SendArgs;
use crate::exit::CliResult;

#[cfg(unix)]
pub fn run(args: SendArgs) -> CliResult<i32> {
    use bluefruit_packet::PacketWriter;
    use bluefruit_transport::{connect_unix, LinkConfig};
    use tracing::info;

    use crate::exit::{packet_error, transport_error, SUCCESS};

    let packet = args.packet.into_packet()?;
    let stream = connect_unix(&args.path, &LinkConfig::default())
        .map_err(|err| transport_error("connect failed", err))?
        .into_inner();

    let mut writer = PacketWriter::new(stream);
    writer
        .write_packet(&packet)
        .map_err(|err| packet_error("send failed", err))?;

    info!(kind = %packet.kind(), path = ?args.path, "packet sent");
    Ok(SUCCESS)
}

#[cfg(not(unix))]
pub fn run(_args: SendArgs) -> CliResult<i32> {
    Err(crate::exit::CliError::usage(
        "unix socket links are not supported on this platform",
    ))
}
