use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CONTRAST_LIMIT, DEFAULT_CROP, DEFAULT_INTERVAL_FRAMES, DEFAULT_MIN_CORRECTION_MS,
    DEFAULT_MIN_LIT_PIXELS, DEFAULT_SCALE_MS_PER_PIXEL, MAX_CROP, MAX_FILTER_LEVEL,
    MAX_INTERVAL_FRAMES, MAX_MIN_CORRECTION_MS, MIN_CROP,
};

/// How the binarization level is chosen for each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ThresholdPolicy {
    /// `min + 0.66 * (max - min)` over the windowed intensities.
    #[default]
    Auto,
    /// Fixed intensity level in 1..=255.
    Fixed(u8),
}

impl ThresholdPolicy {
    /// Map the legacy integer setting (0 = auto) to a policy.
    pub fn from_level(level: i64) -> Self {
        match level.clamp(0, 255) {
            0 => Self::Auto,
            v => Self::Fixed(v as u8),
        }
    }
}

impl std::fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::Fixed(v) => write!(f, "Fixed ({v})"),
        }
    }
}

/// Minimum occupancy rule for noise suppression at level `k`.
///
/// The historical variants of the guider disagree here, so both are kept.
/// `Square` requires the trailing `k x k` window to be fully lit;
/// `Padded` requires the trailing `(k+2) x (k+2)` window to be fully lit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupancyRule {
    #[default]
    Square,
    Padded,
}

impl OccupancyRule {
    /// Side of the trailing window examined for level `k`.
    pub fn window_side(&self, level: u8) -> usize {
        match self {
            Self::Square => level as usize,
            Self::Padded => level as usize + 2,
        }
    }

    /// Lit-pixel count the window must reach.
    pub fn min_count(&self, level: u8) -> u32 {
        let side = self.window_side(level) as u32;
        side * side
    }
}

/// Per-axis switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub inverted: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inverted: true,
        }
    }
}

/// Every tunable the guider reads once per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuideConfig {
    /// Guide window half-size in pixels.
    #[serde(default = "default_crop")]
    pub crop: u32,
    #[serde(default)]
    pub threshold: ThresholdPolicy,
    /// Milliseconds of pulse per pixel of drift at zoom level 0.
    #[serde(default = "default_scale")]
    pub scale_ms_per_pixel: u32,
    /// Dead-band expressed as a pulse duration.
    #[serde(default = "default_min_correction")]
    pub min_correction_ms: u32,
    /// Frames accumulated before a correction is evaluated.
    #[serde(default = "default_interval")]
    pub interval_frames: u32,
    /// Master switch for sending corrections.
    #[serde(default)]
    pub auto_guide: bool,
    #[serde(default)]
    pub ra: AxisConfig,
    #[serde(default)]
    pub dec: AxisConfig,
    #[serde(default = "default_true")]
    pub circular_mask: bool,
    /// Binning level `n`: sum over a trailing `(n+1) x (n+1)` window.
    #[serde(default)]
    pub binning: u8,
    /// Noise-suppression level `k` (0 disables).
    #[serde(default)]
    pub noise_level: u8,
    #[serde(default)]
    pub noise_occupancy: OccupancyRule,
    /// Minimum `max - min` intensity for a valid star.
    #[serde(default = "default_contrast_limit")]
    pub contrast_limit: u8,
    /// A valid star lights strictly more pixels than this.
    #[serde(default = "default_min_lit_pixels")]
    pub min_lit_pixels: u32,
    /// Keep the binary star mask of the last frame for display.
    #[serde(default)]
    pub preview: bool,
}

fn default_true() -> bool {
    true
}
fn default_crop() -> u32 {
    DEFAULT_CROP
}
fn default_scale() -> u32 {
    DEFAULT_SCALE_MS_PER_PIXEL
}
fn default_min_correction() -> u32 {
    DEFAULT_MIN_CORRECTION_MS
}
fn default_interval() -> u32 {
    DEFAULT_INTERVAL_FRAMES
}
fn default_contrast_limit() -> u8 {
    DEFAULT_CONTRAST_LIMIT
}
fn default_min_lit_pixels() -> u32 {
    DEFAULT_MIN_LIT_PIXELS
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            crop: DEFAULT_CROP,
            threshold: ThresholdPolicy::Auto,
            scale_ms_per_pixel: DEFAULT_SCALE_MS_PER_PIXEL,
            min_correction_ms: DEFAULT_MIN_CORRECTION_MS,
            interval_frames: DEFAULT_INTERVAL_FRAMES,
            auto_guide: false,
            ra: AxisConfig::default(),
            dec: AxisConfig::default(),
            circular_mask: true,
            binning: 0,
            noise_level: 0,
            noise_occupancy: OccupancyRule::Square,
            contrast_limit: DEFAULT_CONTRAST_LIMIT,
            min_lit_pixels: DEFAULT_MIN_LIT_PIXELS,
            preview: false,
        }
    }
}

/// Positions of the core tunables in the flat settings list.
mod index {
    pub const CROP: usize = 0;
    pub const THRESHOLD: usize = 1;
    pub const SCALE: usize = 2;
    pub const AUTO_GUIDE: usize = 9;
    pub const MIN_CORRECTION: usize = 10;
    pub const INTERVAL: usize = 11;
    pub const INVERT_RA: usize = 12;
    pub const INVERT_DEC: usize = 13;
    pub const PREVIEW: usize = 14;
    pub const CIRCULAR_MASK: usize = 15;
    pub const NOISE: usize = 18;
    pub const BINNING: usize = 19;
    pub const CONTRAST_LIMIT: usize = 30;
}

impl GuideConfig {
    /// Read the flat ordered integer settings list.
    ///
    /// Camera-only entries are skipped and missing trailing entries keep
    /// their defaults. The result is sanitized.
    pub fn from_values(values: &[i64]) -> Self {
        let mut config = Self::default();
        let get = |i: usize| values.get(i).copied();

        if let Some(v) = get(index::CROP) {
            config.crop = v.clamp(0, u32::MAX as i64) as u32;
        }
        if let Some(v) = get(index::THRESHOLD) {
            config.threshold = ThresholdPolicy::from_level(v);
        }
        if let Some(v) = get(index::SCALE) {
            config.scale_ms_per_pixel = v.clamp(0, u32::MAX as i64) as u32;
        }
        if let Some(v) = get(index::AUTO_GUIDE) {
            config.auto_guide = v != 0;
        }
        if let Some(v) = get(index::MIN_CORRECTION) {
            config.min_correction_ms = v.clamp(0, u32::MAX as i64) as u32;
        }
        if let Some(v) = get(index::INTERVAL) {
            config.interval_frames = v.clamp(0, u32::MAX as i64) as u32;
        }
        if let Some(v) = get(index::INVERT_RA) {
            config.ra.inverted = v != 0;
        }
        if let Some(v) = get(index::INVERT_DEC) {
            config.dec.inverted = v != 0;
        }
        if let Some(v) = get(index::PREVIEW) {
            config.preview = v != 0;
        }
        if let Some(v) = get(index::CIRCULAR_MASK) {
            config.circular_mask = v != 0;
        }
        if let Some(v) = get(index::NOISE) {
            config.noise_level = v.clamp(0, u8::MAX as i64) as u8;
        }
        if let Some(v) = get(index::BINNING) {
            config.binning = v.clamp(0, u8::MAX as i64) as u8;
        }
        if let Some(v) = get(index::CONTRAST_LIMIT) {
            config.contrast_limit = v.clamp(0, u8::MAX as i64) as u8;
        }

        config.sanitized()
    }

    /// Clamp every tunable into its legal range.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();
        c.crop = c.crop.clamp(MIN_CROP, MAX_CROP);
        if c.threshold == ThresholdPolicy::Fixed(0) {
            c.threshold = ThresholdPolicy::Auto;
        }
        c.min_correction_ms = c.min_correction_ms.min(MAX_MIN_CORRECTION_MS);
        c.interval_frames = c.interval_frames.clamp(1, MAX_INTERVAL_FRAMES);
        c.binning = c.binning.min(MAX_FILTER_LEVEL);
        c.noise_level = c.noise_level.min(MAX_FILTER_LEVEL);
        c.contrast_limit = c.contrast_limit.max(1);
        c
    }

    /// Side length of the square guide window.
    pub fn window_side(&self) -> usize {
        self.crop as usize * 2
    }
}
