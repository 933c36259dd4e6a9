use crate::consts::PULSE_COMMAND_LEN;

use super::pulse::{CorrectionPulse, Direction, PULSE_PREFIX};

/// Extract every well-formed pulse command from a byte stream.
///
/// Jog commands are accepted too (the leading `#` is skipped as noise).
/// Malformed fragments are ignored.
pub fn decode_commands(bytes: &[u8]) -> Vec<CorrectionPulse> {
    let mut pulses = Vec::new();
    let mut i = 0;
    while i + PULSE_COMMAND_LEN <= bytes.len() {
        let cmd = &bytes[i..i + PULSE_COMMAND_LEN];
        if let Some(pulse) = decode_one(cmd) {
            pulses.push(pulse);
            i += PULSE_COMMAND_LEN;
        } else {
            i += 1;
        }
    }
    pulses
}

fn decode_one(cmd: &[u8]) -> Option<CorrectionPulse> {
    if &cmd[..3] != PULSE_PREFIX {
        return None;
    }
    let direction = Direction::from_letter(cmd[3])?;
    let mut duration = 0u32;
    for &d in &cmd[4..] {
        if !d.is_ascii_digit() {
            return None;
        }
        duration = duration * 10 + (d - b'0') as u32;
    }
    Some(CorrectionPulse::new(direction, duration))
}
