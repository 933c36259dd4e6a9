use std::io::{ErrorKind, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::error::{GuideError, Result};

use super::MountLink;

/// Mount controller on a serial port.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    path: String,
    timeout: Duration,
}

impl SerialLink {
    /// Open `path` at `baud_rate`. Every write is bounded by `timeout`.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud_rate).timeout(timeout).open()?;
        info!(path, baud_rate, timeout_ms = timeout.as_millis() as u64, "Opened mount link");
        Ok(Self {
            port,
            path: path.to_string(),
            timeout,
        })
    }

    /// Independent handle on the same port, for the telemetry listener.
    pub fn reader(&self) -> Result<Box<dyn SerialPort>> {
        Ok(self.port.try_clone()?)
    }
}

impl MountLink for SerialLink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let timeout_ms = self.timeout.as_millis() as u64;
        let map_err = |e: std::io::Error| match e.kind() {
            ErrorKind::TimedOut | ErrorKind::WouldBlock => GuideError::LinkTimeout(timeout_ms),
            ErrorKind::BrokenPipe | ErrorKind::NotConnected | ErrorKind::UnexpectedEof => {
                GuideError::LinkClosed
            }
            _ => GuideError::Io(e),
        };
        self.port.write_all(bytes).map_err(map_err)?;
        self.port.flush().map_err(map_err)?;
        debug!(command = %String::from_utf8_lossy(bytes), "Sent");
        Ok(())
    }

    fn bytes_to_read(&mut self) -> Result<u32> {
        Ok(self.port.bytes_to_read()?)
    }

    fn name(&self) -> &str {
        &self.path
    }
}
