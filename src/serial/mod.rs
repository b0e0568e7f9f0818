//! # Serial Communication Module
//!
//! Connection lifecycle and byte transport for the Magellan device.
//!
//! This module handles:
//! - Opening the serial port with the Magellan attributes (9600 8N2, RTS/CTS)
//! - The Disconnected -> Connecting -> Connected state machine
//! - Restoring the port's original attributes on every disconnect path
//! - Reading inbound bytes and writing encoded command frames

use tracing::{debug, info, warn};

use crate::error::{MagellanError, Result};

pub mod port_trait;

pub use port_trait::{PortAttrs, SerialPortIo, TokioSerialPort, MAGELLAN_BAUD_RATE};

/// Default device paths to try (in order of preference)
pub const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyS0",   // built-in RS-232 port
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Serial link to the Magellan.
///
/// Exclusively owns the port handle for the lifetime of a connection. The
/// state machine is re-enterable: after a disconnect, `connect` may be
/// called again.
pub struct MagellanLink {
    device_path: String,
    state: LinkState,
    port: Option<Box<dyn SerialPortIo>>,
}

impl std::fmt::Debug for MagellanLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagellanLink")
            .field("device_path", &self.device_path)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl MagellanLink {
    /// Create a disconnected link for the given device path.
    pub fn new(device_path: impl Into<String>) -> Self {
        Self {
            device_path: device_path.into(),
            state: LinkState::Disconnected,
            port: None,
        }
    }

    /// Open and configure the port.
    ///
    /// On success the link is Connected. On open/configure failure the link
    /// returns to Disconnected; no attributes were changed, so none are
    /// restored.
    ///
    /// # Errors
    ///
    /// Returns [`MagellanError::Transport`] if the port cannot be opened or
    /// configured.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state == LinkState::Connected {
            return Ok(());
        }

        self.state = LinkState::Connecting;
        debug!("opening serial port {}", self.device_path);

        match TokioSerialPort::open(&self.device_path) {
            Ok(port) => {
                self.port = Some(Box::new(port));
                self.state = LinkState::Connected;
                info!("connected to Magellan at {}", self.device_path);
                Ok(())
            }
            Err(e) => {
                self.state = LinkState::Disconnected;
                Err(MagellanError::Transport(format!(
                    "failed to open {}: {}",
                    self.device_path, e
                )))
            }
        }
    }

    /// Enter the Connected state with an already-open port.
    ///
    /// Used by tests and by hosts that manage port opening themselves.
    pub fn connect_with(&mut self, port: Box<dyn SerialPortIo>) {
        self.port = Some(port);
        self.state = LinkState::Connected;
    }

    /// Tear the connection down.
    ///
    /// The original port attributes are restored (best-effort, exactly once)
    /// before the handle is released. Safe to call at any time, including
    /// when already disconnected.
    pub fn disconnect(&mut self) {
        if let Some(mut port) = self.port.take() {
            if let Err(e) = port.restore_attrs() {
                warn!("could not restore port attributes: {}", e);
            }
            info!("disconnected from {}", self.device_path);
        }
        self.state = LinkState::Disconnected;
    }

    /// Current lifecycle state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Whether the link is in the Connected state
    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// The configured device path
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Await inbound bytes from the device.
    ///
    /// # Errors
    ///
    /// Returns [`MagellanError::Transport`] if the link is not connected or
    /// the read fails; the caller is expected to disconnect.
    pub async fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| MagellanError::Transport("read on disconnected link".to_string()))?;

        port.read(buf)
            .await
            .map_err(|e| MagellanError::Transport(format!("read failed: {}", e)))
    }

    /// Transmit one encoded command frame.
    ///
    /// Fire-and-forget from the core's perspective; any device response
    /// arrives as an ordinary inbound frame.
    ///
    /// # Errors
    ///
    /// Returns [`MagellanError::Transport`] if the link is not connected or
    /// the write fails.
    pub async fn send_command(&mut self, frame: &[u8]) -> Result<()> {
        let port = self
            .port
            .as_mut()
            .ok_or_else(|| MagellanError::Transport("write on disconnected link".to_string()))?;

        port.write_all(frame)
            .await
            .map_err(|e| MagellanError::Transport(format!("write failed: {}", e)))?;
        port.flush()
            .await
            .map_err(|e| MagellanError::Transport(format!("flush failed: {}", e)))?;

        debug!("sent command frame ({} bytes)", frame.len());
        Ok(())
    }
}
