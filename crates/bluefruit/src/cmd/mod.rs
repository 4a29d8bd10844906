use std::path::PathBuf;
use std::time::Duration;

use bluefruit_packet::{
    AccelerometerPacket, ButtonPacket, ColorPacket, GyroPacket, LocationPacket,
    MagnetometerPacket, Packet, PacketFamily, QuaternionPacket, RawTextPacket,
};
use clap::{Args, Subcommand};

use crate::exit::{packet_error, CliError, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod kinds;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode one frame given as hex.
    Decode(DecodeArgs),
    /// Print the wire bytes of a packet.
    Encode(EncodeArgs),
    /// Send one packet to a Unix socket link.
    Send(SendArgs),
    /// Read packets from a link, capture file or stdin and print them.
    Listen(ListenArgs),
    /// List the registered packet types.
    Kinds,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Send(args) => send::run(args),
        Command::Listen(args) => listen::run(args, format),
        Command::Kinds => kinds::run(format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Frame bytes as hex (whitespace and `:` separators are ignored).
    pub hex: String,
    /// Require the packet to be of this family (any, xyz, or a kind name).
    #[arg(long = "as", value_name = "FAMILY", value_parser = parse_family, default_value = "any")]
    pub family: PacketFamily,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub packet: PacketArgs,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    #[command(subcommand)]
    pub packet: PacketArgs,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Unix socket link to connect to.
    #[arg(long, value_name = "PATH", conflicts_with = "file")]
    pub socket: Option<PathBuf>,
    /// Recorded byte capture to replay.
    #[arg(long, value_name = "PATH", conflicts_with = "socket")]
    pub file: Option<PathBuf>,
    /// Exit after printing N packets.
    #[arg(long)]
    pub count: Option<usize>,
    /// Read timeout for the link or stdin (e.g. 5s, 500ms).
    #[arg(long, default_value = "500ms")]
    pub timeout: String,
    /// Skip bytes outside packet frames instead of reporting them as text.
    #[arg(long)]
    pub no_raw_text: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// A packet described on the command line.
#[derive(Subcommand, Debug, Clone)]
pub enum PacketArgs {
    /// Accelerometer reading (`!A`).
    #[command(allow_negative_numbers = true)]
    Accelerometer { x: f32, y: f32, z: f32 },
    /// Gyro reading (`!G`).
    #[command(allow_negative_numbers = true)]
    Gyro { x: f32, y: f32, z: f32 },
    /// Magnetometer reading (`!M`).
    #[command(allow_negative_numbers = true)]
    Magnetometer { x: f32, y: f32, z: f32 },
    /// Orientation quaternion (`!Q`).
    #[command(allow_negative_numbers = true)]
    Quaternion { x: f32, y: f32, z: f32, w: f32 },
    /// GPS location (`!L`).
    #[command(allow_negative_numbers = true)]
    Location {
        latitude: f32,
        longitude: f32,
        altitude: f32,
    },
    /// Color pick (`!C`), as one packed value (0xRRGGBB, #RRGGBB or decimal) or R G B.
    #[command(allow_negative_numbers = true)]
    Color {
        #[arg(num_args = 1..=3, required = true)]
        values: Vec<String>,
    },
    /// Control pad button (`!B`): 1-4, up, down, left, right, or a single character.
    Button {
        label: String,
        /// Send a release instead of a press.
        #[arg(long)]
        released: bool,
    },
    /// A line of text, sent without header or checksum.
    Text { text: String },
}

impl PacketArgs {
    pub fn into_packet(self) -> CliResult<Packet> {
        let packet = match self {
            PacketArgs::Accelerometer { x, y, z } => AccelerometerPacket::new(x, y, z).into(),
            PacketArgs::Gyro { x, y, z } => GyroPacket::new(x, y, z).into(),
            PacketArgs::Magnetometer { x, y, z } => MagnetometerPacket::new(x, y, z).into(),
            PacketArgs::Quaternion { x, y, z, w } => QuaternionPacket::new(x, y, z, w).into(),
            PacketArgs::Location {
                latitude,
                longitude,
                altitude,
            } => LocationPacket::new(latitude, longitude, altitude).into(),
            PacketArgs::Color { values } => parse_color(&values)?.into(),
            PacketArgs::Button { label, released } => {
                let label = button_label(&label);
                ButtonPacket::new(&label, !released)
                    .map_err(|err| packet_error("invalid button", err))?
                    .into()
            }
            PacketArgs::Text { text } => RawTextPacket::new(text).into(),
        };
        Ok(packet)
    }
}

fn button_label(label: &str) -> String {
    let named = match label.to_ascii_lowercase().as_str() {
        "up" => Some(ButtonPacket::UP),
        "down" => Some(ButtonPacket::DOWN),
        "left" => Some(ButtonPacket::LEFT),
        "right" => Some(ButtonPacket::RIGHT),
        _ => None,
    };
    named.map_or_else(|| label.to_string(), String::from)
}

fn parse_color(values: &[String]) -> CliResult<ColorPacket> {
    match values {
        [packed] => {
            let packed = packed.trim();
            let rgb = match packed
                .strip_prefix("0x")
                .or_else(|| packed.strip_prefix("0X"))
                .or_else(|| packed.strip_prefix('#'))
            {
                Some(digits) => u32::from_str_radix(digits, 16),
                None => packed.parse::<u32>(),
            }
            .map_err(|_| CliError::usage(format!("invalid color value: {packed}")))?;
            ColorPacket::try_from(rgb).map_err(|err| packet_error("invalid color", err))
        }
        [red, green, blue] => {
            let component = |value: &String| {
                value
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| CliError::usage(format!("invalid color component: {value}")))
            };
            ColorPacket::try_from((component(red)?, component(green)?, component(blue)?))
                .map_err(|err| packet_error("invalid color", err))
        }
        _ => Err(CliError::usage(
            "color takes one packed value or three components",
        )),
    }
}

fn parse_family(input: &str) -> Result<PacketFamily, String> {
    PacketFamily::from_name(input).ok_or_else(|| {
        format!("unknown packet family '{input}' (expected any, xyz, or a packet kind)")
    })
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use bluefruit_packet::PacketKind;

    use super::*;
    use crate::exit::{DATA_INVALID, USAGE};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn color_packed_forms() {
        let expected = ColorPacket::new(0x12, 0x34, 0x56);
        assert_eq!(parse_color(&strings(&["0x123456"])).unwrap(), expected);
        assert_eq!(parse_color(&strings(&["#123456"])).unwrap(), expected);
        assert_eq!(parse_color(&strings(&["1193046"])).unwrap(), expected);
    }

    #[test]
    fn color_components() {
        assert_eq!(
            parse_color(&strings(&["255", "0", "7"])).unwrap(),
            ColorPacket::new(255, 0, 7)
        );
        let err = parse_color(&strings(&["256", "0", "0"])).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        let err = parse_color(&strings(&["1", "2"])).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn color_out_of_range_packed_value() {
        let err = parse_color(&strings(&["0x1000000"])).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn named_button_labels() {
        let packet = PacketArgs::Button {
            label: "Left".to_string(),
            released: true,
        }
        .into_packet()
        .unwrap();
        assert_eq!(
            packet,
            Packet::Button(ButtonPacket::from_label(ButtonPacket::LEFT, false).unwrap())
        );

        let err = PacketArgs::Button {
            label: "12".to_string(),
            released: false,
        }
        .into_packet()
        .unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn family_names() {
        assert_eq!(parse_family("xyz").unwrap(), PacketFamily::Xyz);
        assert_eq!(
            parse_family("quaternion").unwrap(),
            PacketFamily::Kind(PacketKind::Quaternion)
        );
        assert!(parse_family("sensor").is_err());
    }
}
