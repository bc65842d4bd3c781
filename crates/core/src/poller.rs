//! Poll controller: the connect/read state machine.
//!
//! Two recurring timers drive the controller — a slow open-retry tick while
//! disconnected and a fast read tick while connected. The controller itself
//! is a plain state machine; scheduling the ticks is the caller's job (the
//! CLI runs them on a current-thread tokio runtime).

use std::time::Duration;

use crate::backlight::BacklightCommand;
use crate::report::KeyStates;
use crate::transport::{self, PanelProvider};
use tracing::{debug, info, warn};

/// Interval between open attempts while disconnected.
pub const OPEN_RETRY_INTERVAL: Duration = Duration::from_millis(2000);

/// Interval between key-state reads while connected.
pub const READ_INTERVAL: Duration = Duration::from_millis(100);

/// Consecutive read failures after which the connection is considered lost.
pub const MAX_CONSECUTIVE_READ_FAILURES: u32 = 3;

/// Connection status of the poll controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStatus {
    Connected,
    Disconnected,
}

/// The poll controller.
///
/// Owns the provider and, while connected, the single device handle. All
/// methods run on one thread of execution; nothing here blocks.
pub struct Poller<P: PanelProvider> {
    provider: P,
    port: Option<P::Port>,
    read_failures: u32,
}

impl<P: PanelProvider> Poller<P> {
    /// Create a controller in the Disconnected state.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            port: None,
            read_failures: 0,
        }
    }

    pub fn status(&self) -> PanelStatus {
        if self.port.is_some() {
            PanelStatus::Connected
        } else {
            PanelStatus::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    /// Open-retry tick body: attempt to connect.
    ///
    /// No-op when already connected. Returns whether the controller is
    /// connected after the call.
    pub fn try_open(&mut self) -> bool {
        if self.port.is_some() {
            return true;
        }

        debug!("searching for panel");
        match self.provider.open() {
            Some(port) => {
                info!("panel connected");
                self.port = Some(port);
                self.read_failures = 0;
                true
            }
            None => false,
        }
    }

    /// Read tick body: fetch the current key states.
    ///
    /// Returns `None` when there is nothing to forward — the controller is
    /// disconnected, or the read failed transiently. A failed read is logged
    /// and counted; after [`MAX_CONSECUTIVE_READ_FAILURES`] in a row the
    /// handle is dropped and the controller returns to Disconnected so the
    /// open-retry timer takes over. A single failure never changes state.
    pub fn poll_keys(&mut self) -> Option<KeyStates> {
        let port = self.port.as_ref()?;

        match transport::read_keys(port) {
            Ok(keys) => {
                self.read_failures = 0;
                Some(keys)
            }
            Err(e) => {
                self.read_failures += 1;
                warn!(
                    error = %e,
                    failures = self.read_failures,
                    "key read failed"
                );
                if self.read_failures >= MAX_CONSECUTIVE_READ_FAILURES {
                    info!("connection lost, returning to retry loop");
                    self.close();
                }
                None
            }
        }
    }

    /// Command path: forward a backlight command to the panel.
    ///
    /// Independent of the poll ticks. The frame is delivered only when the
    /// panel is currently enumerable and a handle is open; otherwise it is
    /// silently dropped. Write errors are logged and swallowed, never
    /// surfaced. Returns whether the frame was delivered.
    pub fn send_backlight(&mut self, command: &BacklightCommand) -> bool {
        if !self.provider.is_present() {
            debug!(key = command.key, "panel not enumerable, dropping backlight command");
            return false;
        }
        let Some(port) = self.port.as_ref() else {
            debug!(key = command.key, "no open handle, dropping backlight command");
            return false;
        };

        match transport::send_backlight(port, command) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, key = command.key, "backlight write failed");
                false
            }
        }
    }

    /// Teardown: release the device handle. Safe to call when already closed.
    pub fn close(&mut self) {
        if self.port.take().is_some() {
            info!("panel closed");
        }
        self.read_failures = 0;
    }
}
