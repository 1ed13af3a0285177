//! Ducky One 2 RGB (108-key US layout) device data.
//!
//! The packet layout — header bytes, key offsets, the 18-entry
//! sequence stride in byte 6 — was captured from the vendor driver's
//! USB traffic and is reproduced verbatim.

use hidapi::HidApi;

use ducky_transport::{HidSelector, HidTransport, TransportError};

use crate::color_manager::{DeviceLayout, REPORT_PAYLOAD_LEN};

pub const DUCKY_ONE2_VID: u16 = 0x04d9;
pub const DUCKY_ONE2_PID: u16 = 0x0348;
pub const DUCKY_ONE2_USAGE: u16 = 1;
pub const DUCKY_ONE2_USAGE_PAGE: u16 = 0xff00;

/// Selector for the keyboard's vendor lighting interface.
pub const DUCKY_ONE2_SELECTOR: HidSelector = HidSelector::new(
    DUCKY_ONE2_VID,
    DUCKY_ONE2_PID,
    DUCKY_ONE2_USAGE,
    DUCKY_ONE2_USAGE_PAGE,
);

/// Default locations of the captured init/exit handshakes.
pub const DUCKY_ONE2_INIT_TRAFFIC: &str = "traffic/ducky_one2_init.txt";
pub const DUCKY_ONE2_EXIT_TRAFFIC: &str = "traffic/ducky_one2_exit.txt";

fn write_header(index: usize, buf: &mut [u8; REPORT_PAYLOAD_LEN]) {
    buf[0] = 0x56;
    buf[1] = 0x42;
    buf[4] = 0x02;
    // The final chunk carries a shorter entry count
    buf[5] = if index == 7 { 0x06 } else { 0x12 };
    buf[6] = (18 * index) as u8;
}

/// Per-key (packet, offset) table for the One 2 RGB, 108-key US layout.
pub static DUCKY_ONE2: DeviceLayout = DeviceLayout {
    name: "Ducky One 2 RGB",
    packet_count: 8,
    report_id: 0x01,
    write_header,
    keys: &[
        // Packet 0
        ("Escape", 0, 0x08),
        ("SectionSign", 0, 0x0b),
        ("Tab", 0, 0x0e),
        ("CapsLock", 0, 0x11),
        ("LeftShift", 0, 0x14),
        ("LeftControl", 0, 0x17),
        ("1", 0, 0x1d),
        ("Q", 0, 0x20),
        ("A", 0, 0x23),
        ("LeftWindows", 0, 0x29),
        ("F1", 0, 0x2c),
        ("2", 0, 0x2f),
        ("W", 0, 0x32),
        ("S", 0, 0x35),
        ("Z", 0, 0x38),
        ("LeftAlt", 0, 0x3b),
        // Packet 1
        ("F2", 1, 0x08),
        ("3", 1, 0x0b),
        ("E", 1, 0x0e),
        ("D", 1, 0x11),
        ("X", 1, 0x14),
        ("F3", 1, 0x1a),
        ("4", 1, 0x1d),
        ("R", 1, 0x20),
        ("F", 1, 0x23),
        ("C", 1, 0x26),
        ("F4", 1, 0x2c),
        ("5", 1, 0x2f),
        ("T", 1, 0x32),
        ("G", 1, 0x35),
        ("V", 1, 0x38),
        // Packet 2
        ("6", 2, 0x0b),
        ("Y", 2, 0x0e),
        ("H", 2, 0x11),
        ("B", 2, 0x14),
        ("Space", 2, 0x17),
        ("F5", 2, 0x1a),
        ("7", 2, 0x1d),
        ("U", 2, 0x20),
        ("J", 2, 0x23),
        ("N", 2, 0x26),
        ("F6", 2, 0x2c),
        ("8", 2, 0x2f),
        ("I", 2, 0x32),
        ("K", 2, 0x35),
        ("M", 2, 0x38),
        // Packet 3
        ("F7", 3, 0x08),
        ("9", 3, 0x0b),
        ("O", 3, 0x0e),
        ("L", 3, 0x11),
        (",", 3, 0x14),
        ("F8", 3, 0x1a),
        ("0", 3, 0x1d),
        ("P", 3, 0x20),
        ("Semicolon", 3, 0x23),
        (".", 3, 0x26),
        ("RightAlt", 3, 0x29),
        ("F9", 3, 0x2c),
        ("-", 3, 0x2f),
        ("[", 3, 0x32),
        ("'", 3, 0x35),
        ("FSlash", 3, 0x38),
        // Packet 4
        ("F10", 4, 0x08),
        ("=", 4, 0x0b),
        ("]", 4, 0x0e),
        ("RightWindows", 4, 0x17),
        ("F11", 4, 0x1a),
        ("RightShift", 4, 0x26),
        ("Function", 4, 0x29),
        ("F12", 4, 0x2c),
        ("Backspace", 4, 0x2f),
        ("BSlash", 4, 0x32),
        ("Enter", 4, 0x35),
        ("RightControl", 4, 0x3b),
        // Packet 5
        ("PrintScreen", 5, 0x08),
        ("Insert", 5, 0x0b),
        ("Delete", 5, 0x0e),
        ("LeftArrow", 5, 0x17),
        ("ScrollLock", 5, 0x1a),
        ("Home", 5, 0x1d),
        ("End", 5, 0x20),
        ("UpArrow", 5, 0x26),
        ("DownArrow", 5, 0x29),
        ("Pause", 5, 0x2c),
        ("PageUp", 5, 0x2f),
        ("PageDown", 5, 0x32),
        ("RightArrow", 5, 0x3b),
        // Packet 6
        ("Calc", 6, 0x08),
        ("NumLock", 6, 0x0b),
        ("N7", 6, 0x0e),
        ("N4", 6, 0x11),
        ("N1", 6, 0x14),
        ("N0", 6, 0x17),
        ("Mute", 6, 0x1a),
        ("Divide", 6, 0x1d),
        ("N8", 6, 0x20),
        ("N5", 6, 0x23),
        ("N2", 6, 0x26),
        ("VolumeDown", 6, 0x2c),
        ("Multiply", 6, 0x2f),
        ("N9", 6, 0x32),
        ("N6", 6, 0x35),
        ("N3", 6, 0x38),
        ("NDelete", 6, 0x3b),
        // Packet 7
        ("VolumeUp", 7, 0x08),
        ("Subtract", 7, 0x0b),
        ("Add", 7, 0x0e),
        ("RightEnter", 7, 0x17),
    ],
};

/// Open the One 2 RGB's lighting interface.
pub fn open_ducky_one2(api: &HidApi) -> Result<HidTransport, TransportError> {
    DUCKY_ONE2_SELECTOR.open(api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use ducky_lighting::Mask;

    #[test]
    fn table_covers_the_whole_board() {
        let names: HashSet<_> = DUCKY_ONE2.keys.iter().map(|&(name, _, _)| name).collect();
        assert_eq!(names.len(), DUCKY_ONE2.keys.len(), "duplicate table entry");
        assert_eq!(names.len(), 108);
        for key in Mask::all().iter() {
            assert!(names.contains(key), "{key} missing from device table");
        }
    }

    #[test]
    fn offsets_stay_inside_the_spill_window() {
        for &(name, packet, offset) in DUCKY_ONE2.keys {
            assert!(packet < DUCKY_ONE2.packet_count, "{name} packet out of range");
            assert!(offset + 2 < REPORT_PAYLOAD_LEN, "{name} would spill");
        }
    }

    #[test]
    fn headers_follow_the_captured_shape() {
        for index in 0..8 {
            let mut buf = [0u8; REPORT_PAYLOAD_LEN];
            (DUCKY_ONE2.write_header)(index, &mut buf);
            assert_eq!(buf[0], 0x56);
            assert_eq!(buf[1], 0x42);
            assert_eq!(buf[4], 0x02);
            assert_eq!(buf[5], if index == 7 { 0x06 } else { 0x12 });
            assert_eq!(buf[6], (18 * index) as u8);
        }
    }
}
