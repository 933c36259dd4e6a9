use serde::{Deserialize, Serialize};

use crate::config::AxisConfig;

/// Mount axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Right ascension, driven by horizontal drift.
    Ra,
    /// Declination, driven by vertical drift.
    Dec,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ra => write!(f, "RA"),
            Self::Dec => write!(f, "DEC"),
        }
    }
}

/// Guiding state of one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPhase {
    /// Guiding off, or the axis is disabled.
    #[default]
    Idle,
    /// Collecting drift within the current interval.
    Accumulating,
    /// Interval elapsed; a correction is evaluated this frame.
    Correcting,
}

impl std::fmt::Display for AxisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Accumulating => write!(f, "Accumulating"),
            Self::Correcting => write!(f, "Correcting"),
        }
    }
}

/// Running drift accumulation for one axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisState {
    pub enabled: bool,
    pub inverted: bool,
    /// Sum of per-frame offsets (pixels) since the last reset.
    pub accumulated_error: f64,
    pub frame_count: u32,
    pub phase: AxisPhase,
}

impl AxisState {
    pub fn apply_config(&mut self, config: &AxisConfig) {
        self.enabled = config.enabled;
        self.inverted = config.inverted;
    }

    pub fn reset(&mut self) {
        self.accumulated_error = 0.0;
        self.frame_count = 0;
    }

    pub fn accumulate(&mut self, offset: f64) {
        self.accumulated_error += offset;
        self.frame_count += 1;
    }

    /// Mean drift per frame over the interval, if any frame was counted.
    pub fn mean_error(&self) -> Option<f64> {
        (self.frame_count > 0).then(|| self.accumulated_error / self.frame_count as f64)
    }
}
