//! Error types for open-xkeys-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID device communication failure (read, write, or API init).
    #[error("HID error: {0}")]
    Hid(String),

    /// Device not found during enumeration.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Value out of valid range.
    #[error("value out of range: {field} = {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Scene serialization/deserialization error.
    #[error("scene error: {0}")]
    Scene(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
