//! XK-24 backlight command encoding.
//!
//! Backlight state is set one key at a time with a fixed 36-byte output
//! report: `[0, 181, bank + key_number, flag]` followed by 32 bytes of
//! padding. Bank 0 addresses the red LED bank, bank 32 the blue bank; the
//! flag switches the addressed LED on (1) or off (0).

use crate::error::Result;
use crate::layout;
use serde::{Deserialize, Serialize};

/// Backlight command length in bytes.
pub const BACKLIGHT_COMMAND_LEN: usize = 36;

/// Leading report ID byte.
const REPORT_ID: u8 = 0;

/// Backlight opcode.
const BACKLIGHT_OPCODE: u8 = 181;

/// Key-number offset selecting the red LED bank.
const RED_BANK: u8 = 0;

/// Key-number offset selecting the blue LED bank.
const BLUE_BANK: u8 = 32;

/// Backlight color selection for one key.
///
/// `Off` clears the red bank for the addressed key, matching the firmware's
/// message table; a lit blue LED is left as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
    Off,
}

impl Color {
    /// All selectable colors.
    pub const ALL: &'static [Color] = &[Color::Red, Color::Blue, Color::Off];

    /// LED bank selector for this color.
    fn bank(&self) -> u8 {
        match self {
            Self::Blue => BLUE_BANK,
            Self::Red | Self::Off => RED_BANK,
        }
    }

    /// Intensity flag: 1 = on, 0 = off.
    fn flag(&self) -> u8 {
        match self {
            Self::Red | Self::Blue => 1,
            Self::Off => 0,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Off => "Off",
        }
    }

    /// Parse a color from a CLI-friendly string (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "red" => Some(Self::Red),
            "blue" => Some(Self::Blue),
            "off" | "none" => Some(Self::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A backlight command addressed to one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacklightCommand {
    /// Color to set.
    pub color: Color,
    /// Logical key index (0-23).
    pub key: usize,
}

impl BacklightCommand {
    pub fn new(color: Color, key: usize) -> Self {
        Self { color, key }
    }

    /// Encode into the 36-byte output report.
    ///
    /// The key index is validated before any bytes are produced, so an
    /// out-of-range command never reaches the device.
    pub fn encode(&self) -> Result<[u8; BACKLIGHT_COMMAND_LEN]> {
        let offset = layout::key_offset(self.key)?;

        let mut buf = [0u8; BACKLIGHT_COMMAND_LEN];
        buf[0] = REPORT_ID;
        buf[1] = BACKLIGHT_OPCODE;
        buf[2] = self.color.bank() + offset;
        buf[3] = self.color.flag();
        Ok(buf)
    }
}
