//! Physical key layout: the board grid, scan codes, and key identity.
//!
//! The grid is stored row-major with `(0, 0)` top left; the column-major
//! view (used by positional effects) has `(0, 0)` bottom left. Scan
//! codes are the code space of the global input hook, so reactive
//! envelopes can match incoming events. Several physical keys share a
//! scan code with a sibling (left/right modifiers, numpad vs.
//! navigation); the `Numpad`/`Right` class tables carry the side-band
//! data needed to tell them apart.

use std::borrow::Borrow;
use std::fmt;

/// Grid rows.
pub const ROWS: usize = 6;
/// Grid columns.
pub const COLS: usize = 21;

/// Key names by physical position, row-major, `(0, 0)` top left.
/// `None` marks grid cells with no key under them.
pub const KEY_GRID_BY_ROW: [[Option<&str>; COLS]; ROWS] = [
    [
        Some("Escape"),
        None,
        Some("F1"),
        Some("F2"),
        Some("F3"),
        Some("F4"),
        Some("F5"),
        Some("F6"),
        Some("F7"),
        Some("F8"),
        Some("F9"),
        Some("F10"),
        Some("F11"),
        Some("F12"),
        Some("PrintScreen"),
        Some("ScrollLock"),
        Some("Pause"),
        Some("Calc"),
        Some("Mute"),
        Some("VolumeDown"),
        Some("VolumeUp"),
    ],
    [
        Some("SectionSign"),
        Some("1"),
        Some("2"),
        Some("3"),
        Some("4"),
        Some("5"),
        Some("6"),
        Some("7"),
        Some("8"),
        Some("9"),
        Some("0"),
        Some("-"),
        Some("="),
        Some("Backspace"),
        Some("Insert"),
        Some("Home"),
        Some("PageUp"),
        Some("NumLock"),
        Some("Divide"),
        Some("Multiply"),
        Some("Subtract"),
    ],
    [
        Some("Tab"),
        Some("Q"),
        Some("W"),
        Some("E"),
        Some("R"),
        Some("T"),
        Some("Y"),
        Some("U"),
        Some("I"),
        Some("O"),
        Some("P"),
        Some("["),
        Some("]"),
        Some("BSlash"),
        Some("Delete"),
        Some("End"),
        Some("PageDown"),
        Some("N7"),
        Some("N8"),
        Some("N9"),
        Some("Add"),
    ],
    [
        Some("CapsLock"),
        Some("A"),
        Some("S"),
        Some("D"),
        Some("F"),
        Some("G"),
        Some("H"),
        Some("J"),
        Some("K"),
        Some("L"),
        Some("Semicolon"),
        Some("'"),
        None,
        Some("Enter"),
        None,
        None,
        None,
        Some("N4"),
        Some("N5"),
        Some("N6"),
        None,
    ],
    [
        Some("LeftShift"),
        None,
        Some("Z"),
        Some("X"),
        Some("C"),
        Some("V"),
        Some("B"),
        Some("N"),
        Some("M"),
        Some(","),
        Some("."),
        Some("FSlash"),
        None,
        Some("RightShift"),
        None,
        Some("UpArrow"),
        None,
        Some("N1"),
        Some("N2"),
        Some("N3"),
        None,
    ],
    [
        Some("LeftControl"),
        Some("LeftWindows"),
        Some("LeftAlt"),
        None,
        None,
        None,
        Some("Space"),
        None,
        None,
        None,
        Some("RightAlt"),
        Some("RightWindows"),
        Some("Function"),
        Some("RightControl"),
        Some("LeftArrow"),
        Some("DownArrow"),
        Some("RightArrow"),
        Some("N0"),
        None,
        Some("NDelete"),
        Some("RightEnter"),
    ],
];

/// Scan codes in the global input hook's code space.
///
/// Duplicates are real: the hook reports the same code for e.g. the
/// numpad digits and the navigation cluster, disambiguated by the
/// event's `is_keypad` flag and name prefix (see the class tables).
const SCAN_CODES: &[(&str, i32)] = &[
    ("Escape", 0x01),
    ("F1", 0x3b),
    ("F2", 0x3c),
    ("F3", 0x3d),
    ("F4", 0x3e),
    ("F5", 0x3f),
    ("F6", 0x40),
    ("F7", 0x41),
    ("F8", 0x42),
    ("F9", 0x43),
    ("F10", 0x44),
    ("F11", 0x57),
    ("F12", 0x58),
    ("PrintScreen", 0x37),
    ("ScrollLock", 0x46),
    ("Pause", 69),
    ("Calc", -183),
    ("Mute", -173),
    ("VolumeDown", -174),
    ("VolumeUp", -175),
    ("SectionSign", 0x29),
    ("1", 0x02),
    ("2", 0x03),
    ("3", 0x04),
    ("4", 0x05),
    ("5", 0x06),
    ("6", 0x07),
    ("7", 0x08),
    ("8", 0x09),
    ("9", 0x0a),
    ("0", 0x0b),
    ("-", 0x0c),
    ("=", 0x0d),
    ("Backspace", 0x0e),
    ("Insert", 82),
    ("Home", 71),
    ("PageUp", 73),
    ("NumLock", 69),
    ("Divide", 0x35),
    ("Multiply", 0x37),
    ("Subtract", 74),
    ("Tab", 0x0f),
    ("Q", 0x10),
    ("W", 0x11),
    ("E", 0x12),
    ("R", 0x13),
    ("T", 0x14),
    ("Y", 0x15),
    ("U", 0x16),
    ("I", 0x17),
    ("O", 0x18),
    ("P", 0x19),
    ("[", 0x1a),
    ("]", 0x1b),
    ("BSlash", 0x2b),
    ("Delete", 83),
    ("End", 79),
    ("PageDown", 81),
    ("N7", 71),
    ("N8", 72),
    ("N9", 73),
    ("Add", 78),
    ("CapsLock", 0x3a),
    ("A", 0x1e),
    ("S", 0x1f),
    ("D", 0x20),
    ("F", 0x21),
    ("G", 0x22),
    ("H", 0x23),
    ("J", 0x24),
    ("K", 0x25),
    ("L", 0x26),
    ("Semicolon", 0x27),
    ("'", 0x28),
    ("Enter", 0x1c),
    ("N4", 75),
    ("N5", 76),
    ("N6", 77),
    ("LeftShift", 0x2a),
    ("Z", 0x2c),
    ("X", 0x2d),
    ("C", 0x2e),
    ("V", 0x2f),
    ("B", 0x30),
    ("N", 0x31),
    ("M", 0x32),
    (",", 0x33),
    (".", 0x34),
    ("FSlash", 0x35),
    ("RightShift", 0x36),
    ("UpArrow", 72),
    ("N1", 79),
    ("N2", 80),
    ("N3", 81),
    ("LeftControl", 0x1d),
    ("LeftWindows", 91),
    ("LeftAlt", 0x38),
    ("Space", 0x39),
    ("RightAlt", 0x38),
    ("RightWindows", 92),
    ("Function", 0x00),
    ("RightControl", 29),
    ("LeftArrow", 75),
    ("DownArrow", 80),
    ("RightArrow", 77),
    ("N0", 82),
    ("NDelete", 83),
    ("RightEnter", 28),
];

/// Keys whose events carry the `is_keypad` flag.
pub const NUMPAD_CLASS: &[&str] = &[
    "Divide", "Multiply", "NumLock", "N1", "N2", "N3", "N4", "N5", "N6", "N7", "N8", "N9", "N0",
    "NDelete",
];

/// Keys whose events carry a "right"-prefixed name.
pub const RIGHT_CLASS: &[&str] = &[
    "RightAlt",
    "RightControl",
    "RightEnter",
    "RightWindows",
    "RightArrow",
];

/// Scan code for a key name, if the key exists.
pub fn scan_code(name: &str) -> Option<i32> {
    SCAN_CODES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|&(_, code)| code)
}

pub fn is_numpad_class(name: &str) -> bool {
    NUMPAD_CLASS.contains(&name)
}

pub fn is_right_class(name: &str) -> bool {
    RIGHT_CLASS.contains(&name)
}

/// Key at a row-major position (`(0, 0)` top left).
pub fn key_at_row_major(row: usize, col: usize) -> Option<&'static str> {
    KEY_GRID_BY_ROW.get(row)?.get(col).copied().flatten()
}

/// Key at a column-major position (`(0, 0)` bottom left).
pub fn key_at_col_major(col: usize, row: usize) -> Option<&'static str> {
    if row >= ROWS {
        return None;
    }
    key_at_row_major(ROWS - 1 - row, col)
}

/// Row-major `(row, col)` position of a key.
pub fn position_row_major(name: &str) -> Option<(usize, usize)> {
    for (row, keys) in KEY_GRID_BY_ROW.iter().enumerate() {
        for (col, key) in keys.iter().enumerate() {
            if *key == Some(name) {
                return Some((row, col));
            }
        }
    }
    None
}

/// Column-major `(col, row)` position of a key, rows counted from the
/// bottom of the board.
pub fn position_col_major(name: &str) -> Option<(usize, usize)> {
    position_row_major(name).map(|(row, col)| (col, ROWS - 1 - row))
}

/// All key names in row-major scan order.
pub fn all_key_names() -> impl Iterator<Item = &'static str> {
    KEY_GRID_BY_ROW.iter().flatten().filter_map(|key| *key)
}

/// A key identity.
///
/// Constructed from a canonical name or resolved from a grid position;
/// equality and hashing are always by canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyIndex(String);

impl KeyIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Resolve a row-major `(row, col)` position to a key identity.
    pub fn from_row_major(row: usize, col: usize) -> Option<Self> {
        key_at_row_major(row, col).map(Self::new)
    }

    /// Resolve a column-major `(col, row)` position to a key identity.
    pub fn from_col_major(col: usize, row: usize) -> Option<Self> {
        key_at_col_major(col, row).map(Self::new)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn position_row_major(&self) -> Option<(usize, usize)> {
        position_row_major(&self.0)
    }

    pub fn position_col_major(&self) -> Option<(usize, usize)> {
        position_col_major(&self.0)
    }
}

impl fmt::Display for KeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyIndex {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Borrow<str> for KeyIndex {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn grid_rows_have_uniform_width() {
        for row in KEY_GRID_BY_ROW.iter() {
            assert_eq!(row.len(), COLS);
        }
    }

    #[test]
    fn every_key_has_a_scan_code() {
        for name in all_key_names() {
            assert!(scan_code(name).is_some(), "missing scan code for {name}");
        }
    }

    #[test]
    fn position_roundtrip_row_major() {
        let (row, col) = position_row_major("Q").unwrap();
        assert_eq!(key_at_row_major(row, col), Some("Q"));
        assert_eq!((row, col), (2, 1));
    }

    #[test]
    fn col_major_origin_is_bottom_left() {
        assert_eq!(key_at_col_major(0, 0), Some("LeftControl"));
        assert_eq!(key_at_col_major(0, ROWS - 1), Some("Escape"));
        assert_eq!(position_col_major("LeftControl"), Some((0, 0)));
    }

    #[test]
    fn key_index_resolves_positions() {
        let q = KeyIndex::from_row_major(2, 1).unwrap();
        assert_eq!(q.name(), "Q");
        assert_eq!(q, KeyIndex::new("Q"));
        assert_eq!(q.position_col_major(), Some((1, 3)));
    }

    #[test]
    fn key_index_hashes_by_name() {
        let mut set = HashSet::new();
        set.insert(KeyIndex::new("W"));
        set.insert(KeyIndex::from_row_major(2, 2).unwrap()); // also W
        assert_eq!(set.len(), 1);
        // Borrow<str> lookup
        assert!(set.contains("W"));
    }

    #[test]
    fn duplicate_scan_codes_are_classed() {
        // Home and N7 share a code; only N7 is numpad-class
        assert_eq!(scan_code("Home"), scan_code("N7"));
        assert!(is_numpad_class("N7"));
        assert!(!is_numpad_class("Home"));
        // LeftArrow and RightArrow do not collide by class
        assert!(is_right_class("RightArrow"));
        assert!(!is_right_class("LeftArrow"));
    }
}
