//! Key-subset masks.
//!
//! A [`Mask`] is an immutable, insertion-ordered set of key names used
//! to restrict which keys an effect applies to. Union and difference
//! build new masks; union deduplicates, keeping the first occurrence.

use crate::layout;

/// An ordered subset of the physical key set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    keys: Vec<String>,
}

impl Mask {
    /// Build a mask from key names, dropping duplicates while keeping
    /// first-occurrence order.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if !out.contains(&key) {
                out.push(key);
            }
        }
        Self { keys: out }
    }

    /// Every key on the board, in row-major scan order.
    pub fn all() -> Self {
        Self::new(layout::all_key_names())
    }

    pub fn wasd() -> Self {
        Self::new(["W", "A", "S", "D"])
    }

    pub fn function_row() -> Self {
        Self::new([
            "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
        ])
    }

    pub fn numpad() -> Self {
        Self::new([
            "N0",
            "N1",
            "N2",
            "N3",
            "N4",
            "N5",
            "N6",
            "N7",
            "N8",
            "N9",
            "Divide",
            "Multiply",
            "NumLock",
            "NDelete",
            "Subtract",
            "Add",
            "RightEnter",
        ])
    }

    /// Append `other`'s keys to this mask's, deduplicated.
    pub fn union(&self, other: &Mask) -> Mask {
        Mask::new(self.iter().chain(other.iter()))
    }

    /// Remove every key of `other` from this mask.
    pub fn difference(&self, other: &Mask) -> Mask {
        Mask::new(self.iter().filter(|key| !other.contains(key)))
    }

    /// Keys present in both masks, in this mask's order.
    pub fn intersection(&self, other: &Mask) -> Mask {
        Mask::new(self.iter().filter(|key| other.contains(key)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
