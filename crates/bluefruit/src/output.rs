use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use bluefruit_packet::{Packet, PacketRegistry, TypeHeader};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// A single decoded field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f32),
    Byte(u8),
    Flag(bool),
    Text(String),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Byte(v) => write!(f, "{v}"),
            FieldValue::Flag(v) => write!(f, "{v}"),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

/// Named fields of a packet in wire order.
pub fn packet_fields(packet: &Packet) -> Vec<(&'static str, FieldValue)> {
    use FieldValue::{Byte, Flag, Float, Text};

    match packet {
        Packet::Accelerometer(p) => xyz(p.x(), p.y(), p.z()),
        Packet::Gyro(p) => xyz(p.x(), p.y(), p.z()),
        Packet::Magnetometer(p) => xyz(p.x(), p.y(), p.z()),
        Packet::Quaternion(p) => vec![
            ("x", Float(p.x())),
            ("y", Float(p.y())),
            ("z", Float(p.z())),
            ("w", Float(p.w())),
        ],
        Packet::Location(p) => vec![
            ("latitude", Float(p.latitude())),
            ("longitude", Float(p.longitude())),
            ("altitude", Float(p.altitude())),
        ],
        Packet::Color(p) => vec![
            ("red", Byte(p.red())),
            ("green", Byte(p.green())),
            ("blue", Byte(p.blue())),
        ],
        Packet::Button(p) => vec![
            ("button", Text(p.button().to_string())),
            ("pressed", Flag(p.pressed())),
        ],
        Packet::RawText(p) => {
            vec![("text", Text(String::from_utf8_lossy(p.text()).into_owned()))]
        }
    }
}

fn xyz(x: f32, y: f32, z: f32) -> Vec<(&'static str, FieldValue)> {
    vec![
        ("x", FieldValue::Float(x)),
        ("y", FieldValue::Float(y)),
        ("z", FieldValue::Float(z)),
    ]
}

/// Header bytes as text, e.g. `!C` or `RT`.
pub fn header_text(header: TypeHeader) -> String {
    String::from_utf8_lossy(header.as_bytes()).into_owned()
}

#[derive(Serialize)]
struct PacketOutput {
    kind: &'static str,
    header: String,
    fields: BTreeMap<&'static str, FieldValue>,
    frame: String,
    timestamp: String,
}

pub fn print_packet(packet: &Packet, format: OutputFormat) {
    let fields = packet_fields(packet);
    let frame = packet.to_bytes();

    match format {
        OutputFormat::Json => {
            let out = PacketOutput {
                kind: packet.kind().name(),
                header: header_text(packet.header()),
                fields: fields.into_iter().collect(),
                frame: hex::encode(&frame),
                timestamp: now_unix_seconds(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "HEADER", "FIELD", "VALUE"]);
            for (name, value) in fields {
                table.add_row(vec![
                    packet.kind().name().to_string(),
                    header_text(packet.header()),
                    name.to_string(),
                    value.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let rendered: Vec<String> = fields
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            println!(
                "{} ({}) {}",
                packet.kind(),
                header_text(packet.header()),
                rendered.join(" ")
            );
        }
        OutputFormat::Raw => {
            print_raw(&frame);
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput {
    kind: &'static str,
    header: String,
    length: usize,
    frame: String,
}

pub fn print_encoded(packet: &Packet, format: OutputFormat) {
    let frame = packet.to_bytes();

    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                kind: packet.kind().name(),
                header: header_text(packet.header()),
                length: frame.len(),
                frame: hex::encode(&frame),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "LENGTH", "FRAME"])
                .add_row(vec![
                    packet.kind().name().to_string(),
                    frame.len().to_string(),
                    hex::encode(&frame),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", hex::encode(&frame)),
        OutputFormat::Raw => print_raw(&frame),
    }
}

#[derive(Serialize)]
struct KindOutput {
    kind: &'static str,
    header: String,
    frame_length: Option<usize>,
}

pub fn print_kinds(registry: &PacketRegistry, format: OutputFormat) {
    let kinds: Vec<KindOutput> = registry
        .headers()
        .into_iter()
        .filter_map(|header| registry.lookup(header).map(|d| (header, d)))
        .map(|(header, descriptor)| KindOutput {
            kind: descriptor.kind.name(),
            header: header_text(header),
            frame_length: descriptor.fixed_length(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&kinds),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["HEADER", "KIND", "FRAME LENGTH"]);
            for kind in &kinds {
                table.add_row(vec![kind.header.clone(), kind.kind.to_string(), length_text(kind)]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for kind in &kinds {
                println!("{} {} {}", kind.header, kind.kind, length_text(kind));
            }
        }
    }
}

fn length_text(kind: &KindOutput) -> String {
    kind.frame_length
        .map_or_else(|| "line".to_string(), |len| len.to_string())
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
