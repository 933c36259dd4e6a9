use tracing::debug;

use crate::error::{GuideError, Result};
use crate::io::SimulatedSky;
use crate::protocol::{decode_commands, CorrectionPulse};

use super::MountLink;

/// In-process mount that moves a [`SimulatedSky`] star on every pulse.
#[derive(Debug, Default)]
pub struct SimulatedMount {
    sky: SimulatedSky,
    received: Vec<CorrectionPulse>,
    sent_bytes: Vec<u8>,
    timeout_writes: bool,
}

impl SimulatedMount {
    pub fn new(sky: SimulatedSky) -> Self {
        Self {
            sky,
            ..Self::default()
        }
    }

    /// Every decoded command, including zero-duration placeholders.
    pub fn received(&self) -> &[CorrectionPulse] {
        &self.received
    }

    /// Raw bytes exactly as written.
    pub fn sent_bytes(&self) -> &[u8] {
        &self.sent_bytes
    }

    /// Make every subsequent write fail with a timeout.
    pub fn set_timeout_writes(&mut self, timeout: bool) {
        self.timeout_writes = timeout;
    }
}

impl MountLink for SimulatedMount {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.timeout_writes {
            return Err(GuideError::LinkTimeout(0));
        }
        self.sent_bytes.extend_from_slice(bytes);
        for pulse in decode_commands(bytes) {
            if !pulse.is_noop() {
                debug!(%pulse, "Simulated mount moving");
                self.sky.apply_pulse(&pulse);
            }
            self.received.push(pulse);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
