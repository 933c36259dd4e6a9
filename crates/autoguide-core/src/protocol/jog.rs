use crate::consts::DEFAULT_JOG_MS;

use super::pulse::{duration_digits, Direction, PULSE_PREFIX};

/// Operator-requested move, sent as `#:Mg<dir><dddd>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JogCommand {
    pub direction: Direction,
    pub duration_ms: u32,
}

impl JogCommand {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            duration_ms: DEFAULT_JOG_MS,
        }
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn encode(&self) -> [u8; 9] {
        let mut out = [0u8; 9];
        out[0] = b'#';
        out[1..4].copy_from_slice(PULSE_PREFIX);
        out[4] = self.direction.letter();
        out[5..].copy_from_slice(&duration_digits(self.duration_ms));
        out
    }
}
