//! XK-24 key report decoding.
//!
//! The panel emits a fixed 33-byte input report. Bytes 0-2 are not used by
//! this protocol; bytes 3-6 each carry six key states in their low six bits,
//! one column of the panel per byte, least-significant bit first. The high
//! two bits of each data byte are ignored.

use crate::error::{Error, Result};
use crate::layout::{KEYS_PER_COLUMN, KEY_COUNT};

/// Input report length in bytes.
pub const KEY_REPORT_LEN: usize = 33;

/// First byte of key-state data within the report.
const KEY_DATA_START: usize = 3;
/// One past the last byte of key-state data.
const KEY_DATA_END: usize = 7;

/// Snapshot of all 24 key states. `true` = pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStates([bool; KEY_COUNT]);

impl KeyStates {
    /// The neutral state: every key released.
    pub fn released() -> Self {
        Self([false; KEY_COUNT])
    }

    /// Whether the key at `index` is pressed. Out-of-range indices read as
    /// released.
    pub fn pressed(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Whether any key is currently pressed.
    pub fn any_pressed(&self) -> bool {
        self.0.iter().any(|&s| s)
    }

    /// Iterate over all key states in logical order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    /// Indices of all currently pressed keys.
    pub fn pressed_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &s)| s)
            .map(|(i, _)| i)
    }
}

impl Default for KeyStates {
    fn default() -> Self {
        Self::released()
    }
}

impl From<[bool; KEY_COUNT]> for KeyStates {
    fn from(states: [bool; KEY_COUNT]) -> Self {
        Self(states)
    }
}

/// Decode a raw input report into key states.
///
/// Accepts any report carrying at least the four key-state bytes; the panel
/// always sends [`KEY_REPORT_LEN`] bytes.
pub fn decode_key_report(data: &[u8]) -> Result<KeyStates> {
    if data.len() < KEY_DATA_END {
        return Err(Error::Hid(format!(
            "key report too short: {} bytes (need at least {})",
            data.len(),
            KEY_DATA_END
        )));
    }

    let mut keys = [false; KEY_COUNT];
    for (column, &byte) in data[KEY_DATA_START..KEY_DATA_END].iter().enumerate() {
        for row in 0..KEYS_PER_COLUMN {
            keys[column * KEYS_PER_COLUMN + row] = byte & (1 << row) != 0;
        }
    }

    Ok(KeyStates(keys))
}
