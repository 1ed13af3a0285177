//! Per-key color state and the packet encoder.
//!
//! A [`KeyColorManager`] owns one [`KeyData`] per physical key and
//! turns the current color map into the device's packet stream. The
//! packet structure is a device constant captured from real traffic
//! (Wireshark + USBPcap against the vendor driver) and is reproduced
//! byte-for-byte, never derived.

use std::collections::HashMap;

use ducky_lighting::{Color, CombiningScheme, KeyColorMap, Mask};
use ducky_transport::{Packet, PacketStream};

use crate::error::KeyboardError;

/// Payload bytes per report.
pub const REPORT_PAYLOAD_LEN: usize = 64;

/// Spill stride: a key whose color bytes run past the end of a packet
/// continues in the next packet at `offset − 60`, not `offset − 64`.
/// Device quirk, observed in captures.
pub const SPILL_STRIDE: usize = 60;

/// Encoding data for one physical key.
#[derive(Debug, Clone)]
pub struct KeyData {
    /// Current color, black until a scheme is applied.
    pub color: Color,
    /// Packet this key's color bytes start in.
    pub packet_number: usize,
    /// Byte offset within that packet.
    pub offset: usize,
}

/// Per-device packet layout: the key table and header constants.
///
/// Supplied as a per-device constant and consumed verbatim.
pub struct DeviceLayout {
    pub name: &'static str,
    /// Data packets per full-board refresh.
    pub packet_count: usize,
    /// Report id used for both data packets and acks.
    pub report_id: u8,
    /// `(key name, packet_number, offset)` per physical key.
    pub keys: &'static [(&'static str, usize, usize)],
    /// Writes the protocol-constant opcode/sequence header bytes.
    pub write_header: fn(usize, &mut [u8; REPORT_PAYLOAD_LEN]),
}

/// Owns the current color of every physical key and encodes it into
/// the device's packet stream.
pub struct KeyColorManager {
    layout: &'static DeviceLayout,
    keys: HashMap<String, KeyData>,
}

impl KeyColorManager {
    pub fn new(layout: &'static DeviceLayout) -> Self {
        let keys = layout
            .keys
            .iter()
            .map(|&(name, packet_number, offset)| {
                debug_assert!(packet_number < layout.packet_count);
                debug_assert!(offset + 2 < REPORT_PAYLOAD_LEN + SPILL_STRIDE);
                (
                    name.to_string(),
                    KeyData {
                        color: Color::BLACK,
                        packet_number,
                        offset,
                    },
                )
            })
            .collect();
        Self { layout, keys }
    }

    pub fn layout(&self) -> &'static DeviceLayout {
        self.layout
    }

    /// Current per-key data.
    pub fn key(&self, name: &str) -> Option<&KeyData> {
        self.keys.get(name)
    }

    /// Set one key's color.
    pub fn set_key_color(&mut self, key: &str, color: Color) -> Result<(), KeyboardError> {
        let data = self
            .keys
            .get_mut(key)
            .ok_or_else(|| KeyboardError::UnknownKey(key.to_string()))?;
        data.color = color;
        Ok(())
    }

    /// Reset every key to black.
    pub fn reset_colors(&mut self) {
        for data in self.keys.values_mut() {
            data.color = Color::BLACK;
        }
    }

    /// Compose `scheme` over `mask` at engine time `now` and write the
    /// resulting colors into the key table.
    pub fn apply_scheme(
        &mut self,
        scheme: &CombiningScheme,
        mask: &Mask,
        now: f64,
    ) -> Result<(), KeyboardError> {
        self.apply_colors(&scheme.get_all_colors(mask, now))
    }

    /// Write an already-computed color map into the key table.
    pub fn apply_colors(&mut self, colors: &KeyColorMap) -> Result<(), KeyboardError> {
        for (key, color) in colors {
            self.set_key_color(key.name(), *color)?;
        }
        Ok(())
    }

    /// Encode the current colors as the device's packet stream:
    /// headered 64-byte data packets, each key's R,G,B at its table
    /// offset (spilling by [`SPILL_STRIDE`]), emitted as alternating
    /// (data, zero-filled ack) pairs in packet order.
    pub fn packets_to_send(&self) -> PacketStream {
        let mut buffers = vec![[0u8; REPORT_PAYLOAD_LEN]; self.layout.packet_count];
        for (index, buffer) in buffers.iter_mut().enumerate() {
            (self.layout.write_header)(index, buffer);
        }

        for data in self.keys.values() {
            let channels = [data.color.r, data.color.g, data.color.b];
            for (k, byte) in channels.into_iter().enumerate() {
                let mut packet = data.packet_number;
                let mut offset = data.offset + k;
                if offset >= REPORT_PAYLOAD_LEN {
                    offset -= SPILL_STRIDE;
                    packet += 1;
                }
                buffers[packet][offset] = byte;
            }
        }

        let mut packets = Vec::with_capacity(buffers.len() * 2);
        for buffer in buffers {
            packets.push(Packet::outbound(buffer.to_vec(), self.layout.report_id));
            // Wait for the controller's ack before the next chunk
            packets.push(Packet::inbound(
                vec![0u8; REPORT_PAYLOAD_LEN],
                self.layout.report_id,
            ));
        }
        PacketStream::from_packets(packets)
    }
}
