//! Device discovery and connection for the XK-24 panel.

use crate::error::{Error, Result};
use crate::transport::{PanelProvider, PanelTransport};
use crate::{XK24_PID, XKEYS_VID};
use hidapi::{HidApi, HidDevice};
use tracing::{debug, info};

/// Information about a discovered XK-24 panel.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub vid: u16,
    pub pid: u16,
    pub path: String,
    pub serial: Option<String>,
    pub product: Option<String>,
}

/// Discover all connected XK-24 panels.
pub fn discover_devices(api: &HidApi) -> Vec<DeviceInfo> {
    let mut devices = Vec::new();
    for info in api.device_list() {
        if info.vendor_id() != XKEYS_VID || info.product_id() != XK24_PID {
            continue;
        }

        info!(
            vid = format_args!("0x{:04X}", info.vendor_id()),
            pid = format_args!("0x{:04X}", info.product_id()),
            path = %info.path().to_string_lossy(),
            "Found XK-24 panel"
        );
        devices.push(DeviceInfo {
            vid: info.vendor_id(),
            pid: info.product_id(),
            path: info.path().to_string_lossy().into_owned(),
            serial: info.serial_number().map(|s| s.to_string()),
            product: info.product_string().map(|s| s.to_string()),
        });
    }

    devices
}

/// Whether a matching panel is currently enumerable. No side effects.
pub fn is_present(api: &HidApi) -> bool {
    api.device_list()
        .any(|d| d.vendor_id() == XKEYS_VID && d.product_id() == XK24_PID)
}

/// Attempt to open the panel in non-blocking mode.
///
/// Failure to open is a normal "try again later" condition: it is logged at
/// debug level and yields `None`, never an error.
pub fn open_panel(api: &HidApi) -> Option<HidPanel> {
    if !is_present(api) {
        debug!("no XK-24 panel enumerable");
        return None;
    }

    match api.open(XKEYS_VID, XK24_PID) {
        Ok(device) => {
            if let Err(e) = device.set_blocking_mode(false) {
                debug!(error = %e, "failed to set non-blocking mode");
                return None;
            }
            info!("opened XK-24 panel");
            Some(HidPanel { device })
        }
        Err(e) => {
            debug!(error = %e, "open failed");
            None
        }
    }
}

/// An open connection to one physical panel.
///
/// Exclusively owned; dropping the handle closes the device.
pub struct HidPanel {
    device: HidDevice,
}

impl PanelTransport for HidPanel {
    fn read_report(&self, buf: &mut [u8]) -> Result<usize> {
        self.device
            .read(buf)
            .map_err(|e| Error::Hid(format!("read: {e}")))
    }

    fn write_report(&self, data: &[u8]) -> Result<usize> {
        self.device
            .write(data)
            .map_err(|e| Error::Hid(format!("write: {e}")))
    }
}

/// Panel provider backed by a live `HidApi` handle.
pub struct HidPanelProvider {
    api: HidApi,
}

impl HidPanelProvider {
    pub fn new() -> Result<Self> {
        let api = HidApi::new().map_err(|e| Error::Hid(format!("hidapi init: {e}")))?;
        Ok(Self { api })
    }

    /// Refresh hidapi's cached device list so hotplug becomes visible.
    fn refresh(&mut self) {
        if let Err(e) = self.api.refresh_devices() {
            debug!(error = %e, "device list refresh failed");
        }
    }
}

impl PanelProvider for HidPanelProvider {
    type Port = HidPanel;

    fn is_present(&mut self) -> bool {
        self.refresh();
        is_present(&self.api)
    }

    fn open(&mut self) -> Option<HidPanel> {
        self.refresh();
        open_panel(&self.api)
    }
}
