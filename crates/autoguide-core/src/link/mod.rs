//! Byte-oriented channel to the mount controller.
//!
//! The guider needs only ordered writes with a bounded wait; nothing it
//! sends is acknowledged. A session without a link still runs every stage
//! and simply skips transmission.

pub mod listener;
pub mod serial;
pub mod simulated;

pub use listener::{spawn_listener, TelemetryListener};
pub use serial::SerialLink;
pub use simulated::SimulatedMount;

use crate::error::Result;
use crate::protocol::{JogCommand, PulsePair};

/// Outbound half of the mount connection.
pub trait MountLink: Send {
    /// Write all bytes, failing on a closed channel or an elapsed timeout.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Bytes waiting on the inbound side.
    fn bytes_to_read(&mut self) -> Result<u32> {
        Ok(0)
    }

    fn name(&self) -> &str;
}

/// Send a correction event: the RA command, then the DEC command.
pub fn send_pulses(link: &mut dyn MountLink, pulses: &PulsePair) -> Result<()> {
    for command in pulses.encode() {
        link.write_bytes(&command)?;
    }
    Ok(())
}

/// Send one manual jog command.
pub fn send_jog(link: &mut dyn MountLink, jog: &JogCommand) -> Result<()> {
    link.write_bytes(&jog.encode())
}
