use std::collections::HashMap;

use crate::config::KeyLayout;

/// Pads as laid out on screen, top row first. Slot 0 is bottom-left.
pub const GRID_ORDER: [usize; 16] = [12, 13, 14, 15, 8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3];

#[rustfmt::skip]
const AZERTY: [(&str, usize); 16] = [
    ("&", 12), ("é", 13), ("\"", 14), ("'", 15),
    ("a", 8), ("z", 9), ("e", 10), ("r", 11),
    ("q", 4), ("s", 5), ("d", 6), ("f", 7),
    ("w", 0), ("x", 1), ("c", 2), ("v", 3),
];

#[rustfmt::skip]
const QWERTY_CODES: [(&str, usize); 16] = [
    ("Digit1", 12), ("Digit2", 13), ("Digit3", 14), ("Digit4", 15),
    ("KeyQ", 8), ("KeyW", 9), ("KeyE", 10), ("KeyR", 11),
    ("KeyA", 4), ("KeyS", 5), ("KeyD", 6), ("KeyF", 7),
    ("KeyZ", 0), ("KeyX", 1), ("KeyC", 2), ("KeyV", 3),
];

/// Keyboard key → pad slot.
#[derive(Clone, Debug)]
pub struct KeyMap {
    layout: KeyLayout,
    keys: HashMap<String, usize>,
}

impl KeyMap {
    pub fn new(layout: KeyLayout) -> Self {
        let table = match layout {
            KeyLayout::Azerty => &AZERTY,
            KeyLayout::QwertyCodes => &QWERTY_CODES,
        };
        let keys = table
            .iter()
            .map(|(k, slot)| (Self::normalize(layout, k), *slot))
            .collect();
        Self { layout, keys }
    }

    pub fn slot_for(&self, key: &str) -> Option<usize> {
        self.keys.get(&Self::normalize(self.layout, key)).copied()
    }

    /// The key bound to `slot`, for labelling pads.
    pub fn key_for(&self, slot: usize) -> Option<&str> {
        self.keys
            .iter()
            .find(|(_, s)| **s == slot)
            .map(|(k, _)| k.as_str())
    }

    // Character keys are case-insensitive; key codes are matched verbatim.
    fn normalize(layout: KeyLayout, key: &str) -> String {
        match layout {
            KeyLayout::Azerty => key.to_lowercase(),
            KeyLayout::QwertyCodes => key.to_string(),
        }
    }
}
