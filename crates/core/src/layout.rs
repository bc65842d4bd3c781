//! Physical key layout of the XK-24.
//!
//! The panel is a 6-row by 4-column grid. Firmware numbers keys down each
//! column in strides of 8, so key numbers 6, 7, 14, 15, 22 and 23 do not
//! exist on the 24-key panel.

use crate::error::{Error, Result};

/// Number of physical keys on the panel.
pub const KEY_COUNT: usize = 24;

/// Keys per column.
pub const KEYS_PER_COLUMN: usize = 6;

/// Number of columns.
pub const COLUMN_COUNT: usize = 4;

/// Firmware key-number stride between adjacent columns.
const COLUMN_STRIDE: u8 = 8;

/// Validate a logical key index (0-based).
pub fn validate_key_index(index: usize) -> Result<()> {
    if index >= KEY_COUNT {
        return Err(Error::OutOfRange {
            field: "key_index",
            value: index as u32,
            min: 0,
            max: (KEY_COUNT - 1) as u32,
        });
    }
    Ok(())
}

/// Map a logical key index (0-23, column-major) to the firmware key number
/// used to address that key in backlight commands.
pub fn key_offset(index: usize) -> Result<u8> {
    validate_key_index(index)?;
    let column = (index / KEYS_PER_COLUMN) as u8;
    let row = (index % KEYS_PER_COLUMN) as u8;
    Ok(column * COLUMN_STRIDE + row)
}
