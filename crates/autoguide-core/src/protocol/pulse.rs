use serde::{Deserialize, Serialize};

use crate::consts::{MAX_PULSE_MS, PULSE_COMMAND_LEN};
use crate::control::Axis;

/// Pulse prefix shared by guide and jog commands.
pub(crate) const PULSE_PREFIX: &[u8; 3] = b":Mg";

/// Guide direction. RA moves east/west, DEC moves north/south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    pub fn letter(&self) -> u8 {
        match self {
            Self::East => b'e',
            Self::West => b'w',
            Self::North => b'n',
            Self::South => b's',
        }
    }

    pub fn from_letter(letter: u8) -> Option<Self> {
        match letter {
            b'e' => Some(Self::East),
            b'w' => Some(Self::West),
            b'n' => Some(Self::North),
            b's' => Some(Self::South),
            _ => None,
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Self::East | Self::West => Axis::Ra,
            Self::North | Self::South => Axis::Dec,
        }
    }

    /// Direction that cancels a drift of the given sign on `axis`.
    /// Negative offsets map to east/north, positive to west/south.
    pub fn for_offset(axis: Axis, offset: f64) -> Self {
        match (axis, offset < 0.0) {
            (Axis::Ra, true) => Self::East,
            (Axis::Ra, false) => Self::West,
            (Axis::Dec, true) => Self::North,
            (Axis::Dec, false) => Self::South,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::East => write!(f, "East"),
            Self::West => write!(f, "West"),
            Self::North => write!(f, "North"),
            Self::South => write!(f, "South"),
        }
    }
}

/// A timed directional move on one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrectionPulse {
    pub direction: Direction,
    /// Always within `0..=9999`.
    pub duration_ms: u32,
}

impl CorrectionPulse {
    /// Durations above the four-digit field saturate at 9999.
    pub fn new(direction: Direction, duration_ms: u32) -> Self {
        Self {
            direction,
            duration_ms: duration_ms.min(MAX_PULSE_MS),
        }
    }

    /// Pulse cancelling `offset_px` of drift at `ms_per_pixel`.
    pub fn from_offset(axis: Axis, offset_px: f64, ms_per_pixel: f64) -> Self {
        let ms = (offset_px.abs() * ms_per_pixel).round();
        let ms = if ms.is_finite() {
            ms.clamp(0.0, MAX_PULSE_MS as f64) as u32
        } else {
            MAX_PULSE_MS
        };
        Self::new(Direction::for_offset(axis, offset_px), ms)
    }

    /// Zero-duration placeholder: `:Mge0000` for RA, `:Mgn0000` for DEC.
    pub fn noop(axis: Axis) -> Self {
        let direction = match axis {
            Axis::Ra => Direction::East,
            Axis::Dec => Direction::North,
        };
        Self::new(direction, 0)
    }

    pub fn axis(&self) -> Axis {
        self.direction.axis()
    }

    pub fn is_noop(&self) -> bool {
        self.duration_ms == 0
    }

    /// The 8-byte ASCII command.
    pub fn encode(&self) -> [u8; PULSE_COMMAND_LEN] {
        let mut out = [0u8; PULSE_COMMAND_LEN];
        out[..3].copy_from_slice(PULSE_PREFIX);
        out[3] = self.direction.letter();
        out[4..].copy_from_slice(&duration_digits(self.duration_ms));
        out
    }
}

impl std::fmt::Display for CorrectionPulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.encode();
        write!(f, "{}", String::from_utf8_lossy(&bytes))
    }
}

/// Four zero-padded ASCII digits, saturating at 9999.
pub(crate) fn duration_digits(duration_ms: u32) -> [u8; 4] {
    let mut v = duration_ms.min(MAX_PULSE_MS);
    let mut digits = [b'0'; 4];
    for d in digits.iter_mut().rev() {
        *d = b'0' + (v % 10) as u8;
        v /= 10;
    }
    digits
}

/// The RA and DEC commands of one correction event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulsePair {
    pub ra: CorrectionPulse,
    pub dec: CorrectionPulse,
}

impl Default for PulsePair {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl PulsePair {
    /// Missing axes are filled with zero-duration commands.
    pub fn new(ra: Option<CorrectionPulse>, dec: Option<CorrectionPulse>) -> Self {
        Self {
            ra: ra.unwrap_or_else(|| CorrectionPulse::noop(Axis::Ra)),
            dec: dec.unwrap_or_else(|| CorrectionPulse::noop(Axis::Dec)),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.ra.is_noop() && self.dec.is_noop()
    }

    /// Both commands, RA first.
    pub fn encode(&self) -> [[u8; PULSE_COMMAND_LEN]; 2] {
        [self.ra.encode(), self.dec.encode()]
    }
}

impl std::fmt::Display for PulsePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.ra, self.dec)
    }
}
