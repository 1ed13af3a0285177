//! Binary frame model and its file-based textual serialization.
//!
//! A [`Packet`] is one HID report: a direction, a report id, and a
//! payload. Canned traffic (captured init/exit handshakes) lives in
//! text files, one packet per line — `<direction> <hex>` where the
//! direction is `O` (outbound, for sending) or `I` (inbound, the
//! expected frame) and the hex decodes to `[report_id, payload…]`.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PacketError, TransportError};

/// One HID report frame.
///
/// Equality is structural; packets are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Outbound packets are sent; inbound packets describe the frame
    /// expected back from the device.
    pub outbound: bool,
    pub payload: Vec<u8>,
    pub report_id: u8,
}

impl Packet {
    /// An outbound (for-sending) packet.
    pub fn outbound(payload: Vec<u8>, report_id: u8) -> Self {
        Self {
            outbound: true,
            payload,
            report_id,
        }
    }

    /// An inbound (expected-response) packet.
    pub fn inbound(payload: Vec<u8>, report_id: u8) -> Self {
        Self {
            outbound: false,
            payload,
            report_id,
        }
    }

    /// Parse a traffic-line packet: direction `"O"`/`"I"` plus an
    /// even-length hex string whose first decoded byte is the report id.
    pub fn parse(direction: &str, hex_string: &str) -> Result<Self, PacketError> {
        let outbound = match direction {
            "O" => true,
            "I" => false,
            other => return Err(PacketError::InvalidDirection(other.to_string())),
        };
        let data = hex::decode(hex_string)?;
        let (&report_id, payload) = data.split_first().ok_or(PacketError::Empty)?;
        Ok(Self {
            outbound,
            payload: payload.to_vec(),
            report_id,
        })
    }

    /// Exact inverse of [`Packet::parse`]: report-id byte prepended to
    /// the payload, hex-encoded.
    pub fn serialize(&self) -> String {
        hex::encode(self.wire_frame())
    }

    /// The frame as it crosses the transport boundary:
    /// `[report_id, payload…]`.
    pub fn wire_frame(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(self.payload.len() + 1);
        frame.push(self.report_id);
        frame.extend_from_slice(&self.payload);
        frame
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.outbound { "O" } else { "I" };
        write!(f, "{direction} {}", self.serialize())
    }
}

/// An ordered sequence of packets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketStream {
    packets: Vec<Packet>,
}

impl PacketStream {
    pub fn from_packets(packets: Vec<Packet>) -> Self {
        Self { packets }
    }

    /// Parse a prepared-traffic text body.
    ///
    /// Blank lines and lines whose first character is not `I`/`O` are
    /// skipped, as are lines that fail to parse — canned traffic files
    /// routinely carry comments and partial captures.
    pub fn parse_str(text: &str) -> Self {
        let mut packets = Vec::new();
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let direction = match line.as_bytes()[0] {
                b'I' => "I",
                b'O' => "O",
                _ => continue,
            };
            let hex_string = line.get(2..).unwrap_or("");
            match Packet::parse(direction, hex_string) {
                Ok(packet) => packets.push(packet),
                Err(error) => debug!(%line, %error, "skipping malformed traffic line"),
            }
        }
        Self { packets }
    }

    /// Load a prepared-traffic file. Only I/O failures are errors;
    /// malformed lines are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let stream = Self::parse_str(&text);
        info!(path = %path.display(), packets = stream.len(), "loaded traffic file");
        Ok(stream)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Packet> {
        self.packets.iter()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}

impl fmt::Display for PacketStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for packet in &self.packets {
            writeln!(f, "{packet}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_outbound_packet() {
        let packet = Packet::parse("O", "0102").unwrap();
        assert!(packet.outbound);
        assert_eq!(packet.report_id, 1);
        assert_eq!(packet.payload, vec![0x02]);
    }

    #[test]
    fn serialize_is_parse_inverse() {
        let hex = "0102deadbeef";
        let packet = Packet::parse("O", hex).unwrap();
        assert_eq!(packet.serialize(), hex);
        assert_eq!(packet.to_string(), format!("O {hex}"));

        let inbound = Packet::parse("I", hex).unwrap();
        assert!(!inbound.outbound);
        assert_eq!(inbound.serialize(), hex);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            Packet::parse("X", "0102"),
            Err(PacketError::InvalidDirection(_))
        ));
        assert!(matches!(
            Packet::parse("O", "012"),
            Err(PacketError::InvalidHex(_))
        ));
        assert!(matches!(
            Packet::parse("O", "zz"),
            Err(PacketError::InvalidHex(_))
        ));
        assert!(matches!(Packet::parse("O", ""), Err(PacketError::Empty)));
    }

    #[test]
    fn wire_frame_prepends_report_id() {
        let packet = Packet::outbound(vec![0xaa, 0xbb], 0x05);
        assert_eq!(packet.wire_frame(), vec![0x05, 0xaa, 0xbb]);
    }

    #[test]
    fn stream_parsing_skips_junk_lines() {
        let text = "O 0102\n\n# a comment\nI 0100\nmalformed\nO zzzz\nO 010304\n";
        let stream = PacketStream::parse_str(text);
        assert_eq!(stream.len(), 3);
        let packets: Vec<_> = stream.iter().collect();
        assert!(packets[0].outbound);
        assert!(!packets[1].outbound);
        assert_eq!(packets[2].payload, vec![0x03, 0x04]);
    }

    #[test]
    fn stream_roundtrips_through_display() {
        let text = "O 0102\nI 0100\n";
        let stream = PacketStream::parse_str(text);
        assert_eq!(stream.to_string(), text);
        assert_eq!(PacketStream::parse_str(&stream.to_string()), stream);
    }

    #[test]
    fn structural_equality() {
        let a = Packet::parse("O", "0102").unwrap();
        let b = Packet::outbound(vec![0x02], 1);
        assert_eq!(a, b);
        let c = Packet::inbound(vec![0x02], 1);
        assert_ne!(a, c);
    }
}
