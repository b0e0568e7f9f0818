//! Trait abstraction for serial port operations to enable testing.
//!
//! The concrete implementation wraps `tokio_serial::SerialStream`; it
//! snapshots the attributes it finds on open and can put them back on
//! disconnect, mirroring the save/apply/restore dance a raw termios driver
//! performs.

use async_trait::async_trait;
use std::io;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPort, SerialPortBuilderExt, StopBits};
use tracing::debug;

/// Magellan line rate (RS-232, fixed by the device)
pub const MAGELLAN_BAUD_RATE: u32 = 9600;

/// Snapshot of a port's terminal attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortAttrs {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
}

impl PortAttrs {
    /// The attributes the Magellan requires: 9600 baud, 8 data bits, no
    /// parity, 2 stop bits, RTS/CTS handshake.
    pub fn magellan() -> Self {
        Self {
            baud_rate: MAGELLAN_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::Two,
            flow_control: FlowControl::Hardware,
        }
    }

    fn snapshot(port: &tokio_serial::SerialStream) -> tokio_serial::Result<Self> {
        Ok(Self {
            baud_rate: port.baud_rate()?,
            data_bits: port.data_bits()?,
            parity: port.parity()?,
            stop_bits: port.stop_bits()?,
            flow_control: port.flow_control()?,
        })
    }

    fn apply(&self, port: &mut tokio_serial::SerialStream) -> tokio_serial::Result<()> {
        port.set_baud_rate(self.baud_rate)?;
        port.set_data_bits(self.data_bits)?;
        port.set_parity(self.parity)?;
        port.set_stop_bits(self.stop_bits)?;
        port.set_flow_control(self.flow_control)?;
        Ok(())
    }
}

/// Trait for serial port I/O operations
#[async_trait]
pub trait SerialPortIo: Send {
    /// Read available bytes into the buffer, returning the count
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write all data to the port
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush the output buffer
    async fn flush(&mut self) -> io::Result<()>;

    /// Attributes captured when the port was opened
    fn original_attrs(&self) -> PortAttrs;

    /// Put the original attributes back. Best-effort: the caller releases
    /// the handle whether or not this succeeds.
    fn restore_attrs(&mut self) -> io::Result<()>;
}

/// Wrapper around `tokio_serial::SerialStream` that implements [`SerialPortIo`].
pub struct TokioSerialPort {
    port: tokio_serial::SerialStream,
    original: PortAttrs,
}

impl TokioSerialPort {
    /// Open a serial device and configure it for the Magellan.
    ///
    /// The attributes found on the freshly opened handle are snapshotted
    /// before the Magellan attributes are applied, so a later
    /// [`restore_attrs`](SerialPortIo::restore_attrs) puts the port back the
    /// way it was found.
    pub fn open(path: &str) -> tokio_serial::Result<Self> {
        let mut port = tokio_serial::new(path, MAGELLAN_BAUD_RATE).open_native_async()?;

        let original = PortAttrs::snapshot(&port)?;
        PortAttrs::magellan().apply(&mut port)?;
        debug!("opened {} and applied Magellan attributes", path);

        Ok(Self { port, original })
    }
}

impl std::fmt::Debug for TokioSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioSerialPort")
            .field("original", &self.original)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SerialPortIo for TokioSerialPort {
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        use tokio::io::AsyncReadExt;
        self.port.read(buf).await
    }

    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.flush().await
    }

    fn original_attrs(&self) -> PortAttrs {
        self.original
    }

    fn restore_attrs(&mut self) -> io::Result<()> {
        self.original
            .apply(&mut self.port)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock serial port for testing: replays queued reads, records writes,
    /// counts attribute restorations.
    #[derive(Clone)]
    pub struct MockSerialPort {
        pub written_data: Arc<Mutex<Vec<Vec<u8>>>>,
        pub read_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
        pub restore_count: Arc<Mutex<u32>>,
        pub write_error: Arc<Mutex<Option<io::ErrorKind>>>,
        pub read_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockSerialPort {
        pub fn new() -> Self {
            Self {
                written_data: Arc::new(Mutex::new(Vec::new())),
                read_queue: Arc::new(Mutex::new(VecDeque::new())),
                restore_count: Arc::new(Mutex::new(0)),
                write_error: Arc::new(Mutex::new(None)),
                read_error: Arc::new(Mutex::new(None)),
            }
        }

        pub fn get_written_data(&self) -> Vec<Vec<u8>> {
            self.written_data.lock().unwrap().clone()
        }

        pub fn queue_read(&self, data: &[u8]) {
            self.read_queue.lock().unwrap().push_back(data.to_vec());
        }

        pub fn restore_count(&self) -> u32 {
            *self.restore_count.lock().unwrap()
        }

        pub fn set_write_error(&self, error: io::ErrorKind) {
            *self.write_error.lock().unwrap() = Some(error);
        }

        pub fn set_read_error(&self, error: io::ErrorKind) {
            *self.read_error.lock().unwrap() = Some(error);
        }
    }

    #[async_trait]
    impl SerialPortIo for MockSerialPort {
        async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if let Some(error) = *self.read_error.lock().unwrap() {
                return Err(io::Error::new(error, "mock read error"));
            }
            match self.read_queue.lock().unwrap().pop_front() {
                Some(data) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    Ok(n)
                }
                None => Ok(0),
            }
        }

        async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
            if let Some(error) = *self.write_error.lock().unwrap() {
                return Err(io::Error::new(error, "mock write error"));
            }
            self.written_data.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        async fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn original_attrs(&self) -> PortAttrs {
            PortAttrs::magellan()
        }

        fn restore_attrs(&mut self) -> io::Result<()> {
            *self.restore_count.lock().unwrap() += 1;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magellan_attrs() {
        let attrs = PortAttrs::magellan();
        assert_eq!(attrs.baud_rate, 9600);
        assert_eq!(attrs.data_bits, DataBits::Eight);
        assert_eq!(attrs.parity, Parity::None);
        assert_eq!(attrs.stop_bits, StopBits::Two);
        assert_eq!(attrs.flow_control, FlowControl::Hardware);
    }

    #[tokio::test]
    async fn test_open_with_invalid_path_returns_error() {
        let result = TokioSerialPort::open("/dev/nonexistent_serial_device_12345");
        assert!(result.is_err());
    }
}
