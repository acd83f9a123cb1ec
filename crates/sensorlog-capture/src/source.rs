//! Byte sources: the transport seam and its serial-port implementation.

use std::io::Read;
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::error::TransportError;

pub use serialport::{SerialPortInfo, SerialPortType, UsbPortInfo};

/// Default baud rate for the sensor firmware.
pub const DEFAULT_BAUD: u32 = 115_200;

/// Bounded wait for a read attempt when no bytes are pending.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Anything the capture loop can pull bytes from.
///
/// `read_chunk` returns however many bytes were available, or `Ok(0)` if
/// nothing arrived within the transport's bounded wait. Errors are fatal to
/// the session; the handle is released on drop.
pub trait ByteSource: Send {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

/// Serial port parameters. Baud is not validated here; the contract assumes
/// a transport the OS accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    pub port: String,
    pub baud: u32,
    pub timeout: Duration,
}

impl SerialConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud: DEFAULT_BAUD,
            timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A live serial port handle.
pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    /// Open the configured port.
    ///
    /// # Errors
    /// Returns [`TransportError::Open`] if the OS refuses the port (absent
    /// device, permission denied, busy).
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let port = serialport::new(&config.port, config.baud)
            .timeout(config.timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: config.port.clone(),
                source,
            })?;
        info!(port = %config.port, baud = config.baud, "serial port opened");
        Ok(Self { port })
    }
}

impl std::fmt::Debug for SerialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSource")
            .field("port", &self.port.name())
            .finish()
    }
}

impl ByteSource for SerialSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            // Timeout just means the device had nothing to say this round.
            Err(e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::Interrupted =>
            {
                debug!("serial read timed out with no data");
                Ok(0)
            }
            Err(e) => Err(TransportError::Read(e)),
        }
    }
}

/// Enumerate serial ports visible to the OS.
///
/// # Errors
/// Returns [`TransportError::Enumerate`] if the platform enumeration fails.
pub fn list_ports() -> Result<Vec<SerialPortInfo>, TransportError> {
    serialport::available_ports().map_err(TransportError::Enumerate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SerialConfig::new("/dev/ttyUSB0");
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud, DEFAULT_BAUD);
        assert_eq!(config.timeout, DEFAULT_READ_TIMEOUT);
    }

    #[test]
    fn test_config_builders() {
        let config = SerialConfig::new("COM3")
            .with_baud(9600)
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.baud, 9600);
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_open_missing_port_reports_name() {
        let config = SerialConfig::new("/dev/does-not-exist-sensorlog");
        match SerialSource::open(&config) {
            Err(TransportError::Open { port, .. }) => {
                assert_eq!(port, "/dev/does-not-exist-sensorlog");
            }
            Ok(_) => panic!("opening a nonexistent port should fail"),
            Err(other) => panic!("unexpected error variant: {other}"),
        }
    }
}
