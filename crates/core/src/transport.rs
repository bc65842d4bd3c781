//! HID transport abstraction for panel communication.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface.

use crate::backlight::BacklightCommand;
use crate::error::Result;
use crate::report::{decode_key_report, KeyStates, KEY_REPORT_LEN};
use tracing::trace;

/// Abstraction over raw panel I/O.
pub trait PanelTransport {
    /// Non-blocking read of one input report into `buf`.
    ///
    /// Returns `Ok(0)` when no report is pending.
    fn read_report(&self, buf: &mut [u8]) -> Result<usize>;

    /// Write one output report, returning the number of bytes written.
    fn write_report(&self, data: &[u8]) -> Result<usize>;
}

/// Source of panel connections for the poll controller.
///
/// Splitting enumeration and opening from raw I/O lets the controller state
/// machine run against mock hardware in tests.
pub trait PanelProvider {
    type Port: PanelTransport;

    /// Whether a matching panel is currently enumerable. No side effects.
    fn is_present(&mut self) -> bool;

    /// Attempt to open the panel. `None` means "not found right now" — a
    /// normal condition, not an error.
    fn open(&mut self) -> Option<Self::Port>;
}

/// Read the current key states from the panel.
///
/// A non-blocking read with no data pending yields the neutral all-released
/// state; "nothing pressed right now" and "device absent" are not
/// distinguished at this layer.
pub fn read_keys(panel: &dyn PanelTransport) -> Result<KeyStates> {
    let mut buf = [0u8; KEY_REPORT_LEN];
    let n = panel.read_report(&mut buf)?;
    if n == 0 {
        return Ok(KeyStates::released());
    }

    trace!(
        len = n,
        report_hex = format_args!("{:02X?}", &buf[..n]),
        "key report RX"
    );
    decode_key_report(&buf[..n])
}

/// Send one backlight command frame to the panel.
pub fn send_backlight(panel: &dyn PanelTransport, command: &BacklightCommand) -> Result<()> {
    let frame = command.encode()?;
    trace!(
        key = command.key,
        color = command.color.label(),
        header_hex = format_args!("{:02X?}", &frame[..4]),
        "backlight TX"
    );
    panel.write_report(&frame)?;
    Ok(())
}
