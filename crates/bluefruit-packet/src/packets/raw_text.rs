use bytes::{BufMut, Bytes, BytesMut};

/// A line of text sent from the app's UART screen.
///
/// Unlike the controller packets there is no header, no length and no
/// checksum on the wire: just bytes up to a newline. A line can therefore
/// never start with `!`. Surrounding whitespace is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawTextPacket {
    text: Bytes,
}

impl RawTextPacket {
    pub fn new(text: impl Into<Bytes>) -> Self {
        let text = text.into();
        let start = text
            .iter()
            .position(|b| !is_whitespace(*b))
            .unwrap_or(text.len());
        let end = text
            .iter()
            .rposition(|b| !is_whitespace(*b))
            .map_or(start, |pos| pos + 1);
        Self {
            text: text.slice(start..end),
        }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// The text as UTF-8, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.text).ok()
    }

    pub fn into_bytes(self) -> Bytes {
        self.text
    }

    /// Append the text followed by a newline.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(self.text.len() + 1);
        dst.put_slice(&self.text);
        dst.put_u8(b'\n');
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(self.text.len() + 1);
        self.encode(&mut dst);
        dst.freeze()
    }
}

impl From<&str> for RawTextPacket {
    fn from(text: &str) -> Self {
        Self::new(Bytes::copy_from_slice(text.as_bytes()))
    }
}

// Space, \t, \n, \v, \f and \r.
fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_line_ending_and_padding() {
        let packet = RawTextPacket::new(Bytes::from_static(b"  hello world\r\n"));
        assert_eq!(packet.text(), b"hello world");
        assert_eq!(packet.as_str(), Some("hello world"));
    }

    #[test]
    fn trims_vertical_tab_and_form_feed() {
        let packet = RawTextPacket::new(Bytes::from_static(b"\x0bhi\x0c"));
        assert_eq!(packet.text(), b"hi");
    }

    #[test]
    fn whitespace_only_becomes_empty() {
        assert!(RawTextPacket::new(Bytes::from_static(b" \n")).text().is_empty());
        assert!(RawTextPacket::new(Bytes::new()).text().is_empty());
    }

    #[test]
    fn non_utf8_text_is_kept() {
        let packet = RawTextPacket::new(Bytes::from_static(b"\xffdata\n"));
        assert_eq!(packet.text(), b"\xffdata");
        assert_eq!(packet.as_str(), None);
    }

    #[test]
    fn encode_appends_newline() {
        assert_eq!(RawTextPacket::from("hello").to_bytes().as_ref(), b"hello\n");
    }
}
