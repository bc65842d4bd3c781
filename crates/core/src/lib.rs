//! open-xkeys-core: XK-24 report protocol, device discovery, and polling.
//!
//! This crate provides the cross-platform core logic for talking to the
//! P.I. Engineering X-keys XK-24 programmable keypad over USB HID: decoding
//! key-state reports, encoding per-key backlight commands, and running the
//! connect/poll state machine that keeps a presentation layer fed with
//! key events.

pub mod backlight;
pub mod device;
pub mod error;
#[cfg(test)]
mod integration_tests;
pub mod layout;
pub mod poller;
pub mod report;
pub mod scene;
pub mod transport;

/// P.I. Engineering USB Vendor ID.
pub const XKEYS_VID: u16 = 0x05F3;

/// X-keys XK-24 product ID.
pub const XK24_PID: u16 = 0x0405;
