use bytes::{BufMut, BytesMut};

use crate::error::{PacketError, Result};
use crate::header::{PacketKind, TypeHeader, HEADER_SIZE};
use crate::packet::{payload, ControllerPacket, Packet};

const PRESSED: u8 = b'1';
const RELEASED: u8 = b'0';

/// A control pad button press or release (`!B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonPacket {
    button: char,
    pressed: bool,
}

impl ButtonPacket {
    pub const BUTTON_1: char = '1';
    pub const BUTTON_2: char = '2';
    pub const BUTTON_3: char = '3';
    pub const BUTTON_4: char = '4';
    pub const UP: char = '5';
    pub const DOWN: char = '6';
    pub const LEFT: char = '7';
    pub const RIGHT: char = '8';

    /// Build from a button label, which must be exactly one ASCII character.
    pub fn new(button: &str, pressed: bool) -> Result<Self> {
        let mut chars = button.chars();
        match (chars.next(), chars.next()) {
            (Some(label), None) => Self::from_label(label, pressed),
            _ => Err(PacketError::invalid_field(
                "button",
                format!(
                    "label must be a single character, got {} characters",
                    button.chars().count()
                ),
            )),
        }
    }

    /// Build from a single label character. It occupies one wire byte, so it
    /// must be ASCII.
    pub fn from_label(button: char, pressed: bool) -> Result<Self> {
        if !button.is_ascii() {
            return Err(PacketError::invalid_field(
                "button",
                format!("label {button:?} is not ASCII"),
            ));
        }
        Ok(Self { button, pressed })
    }

    /// The button label, e.g. [`ButtonPacket::UP`].
    pub const fn button(&self) -> char {
        self.button
    }

    /// True when pressed, false when released.
    pub const fn pressed(&self) -> bool {
        self.pressed
    }
}

impl ControllerPacket for ButtonPacket {
    const KIND: PacketKind = PacketKind::Button;
    const HEADER: TypeHeader = TypeHeader::BUTTON;
    const FRAME_LENGTH: usize = HEADER_SIZE + 2 + 1;

    fn parse(frame: &[u8]) -> Result<Self> {
        let (label, state) = match payload::<Self>(frame)? {
            &[label, state] => (label, state),
            other => {
                return Err(PacketError::invalid_field(
                    "button",
                    format!("expected 2 payload bytes, got {}", other.len()),
                ))
            }
        };
        let pressed = match state {
            PRESSED => true,
            RELEASED => false,
            other => {
                return Err(PacketError::invalid_field(
                    "button state",
                    format!("expected '1' or '0', got {other:#04x}"),
                ))
            }
        };
        // Any byte is accepted on the way in; it maps onto U+0000..=U+00FF.
        Ok(Self {
            button: char::from(label),
            pressed,
        })
    }

    fn write_payload(&self, dst: &mut BytesMut) {
        // Labels are ASCII when constructed and at most U+00FF when decoded,
        // so the cast is lossless.
        dst.put_u8(self.button as u8);
        dst.put_u8(if self.pressed { PRESSED } else { RELEASED });
    }

    fn into_packet(self) -> Packet {
        Packet::Button(self)
    }

    fn from_packet(packet: Packet) -> Option<Self> {
        match packet {
            Packet::Button(p) => Some(p),
            _ => None,
        }
    }
}
